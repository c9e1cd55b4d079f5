//! Notification channel adapters
//!
//! One adapter per external service. Each converts an [`AlertEvent`] into
//! the provider-specific payload and performs a single outbound call.
//! Adapters never retry; the dispatch layer records the outcome and the
//! job-scheduling layer owns retry policy.

pub mod asana;
pub mod datadog;
pub mod discord;
pub mod email;
pub mod slack;
pub mod webex;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DestinationConfig;
use crate::{AlertEvent, Destination};

/// Result of one delivery attempt.
pub type NotifyResult = Result<(), NotifyError>;

/// Failure of a single adapter call. Isolated per destination by the
/// dispatch coordinator; never aborts other destinations.
#[derive(Debug)]
pub enum NotifyError {
    /// Network-level failure (connect, timeout, TLS)
    Transport(String),

    /// The service answered with a non-success status code
    UnexpectedStatus(u16),

    /// Destination configuration cannot be used (e.g. bad address)
    InvalidConfig(String),

    /// The channel needs a transport that was not configured
    NotConfigured(&'static str),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Transport(msg) => write!(f, "transport error: {}", msg),
            NotifyError::UnexpectedStatus(status) => {
                write!(f, "unexpected response status: {}", status)
            }
            NotifyError::InvalidConfig(msg) => write!(f, "invalid destination config: {}", msg),
            NotifyError::NotConfigured(what) => write!(f, "{} transport not configured", what),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Transport(err.to_string())
    }
}

/// A notification delivery channel for one destination.
///
/// Implementations perform exactly one outbound call per `notify`
/// invocation and report the outcome instead of raising.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn notify(&self, event: &AlertEvent) -> NotifyResult;

    /// Stable channel kind (e.g. `"slack"`), used for logging.
    fn kind(&self) -> &'static str;
}

/// Shared outbound transports, constructed once at startup and passed
/// into every channel (no per-request globals).
#[derive(Clone)]
pub struct Transports {
    /// HTTP client with the fixed outbound timeout applied
    pub http: reqwest::Client,

    /// SMTP transport; `None` disables email destinations
    pub mailer: Option<Arc<email::Mailer>>,
}

impl Transports {
    pub fn new(timeout: std::time::Duration, mailer: Option<email::Mailer>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            mailer: mailer.map(Arc::new),
        })
    }
}

/// Instantiate the adapter for a destination.
///
/// Unknown destination kinds cannot reach this point: they are rejected
/// when the configuration is deserialized.
pub fn channel_for(destination: &Destination, transports: &Transports) -> Box<dyn NotificationChannel> {
    match &destination.config {
        DestinationConfig::Slack(config) => {
            Box::new(slack::SlackChannel::new(transports.http.clone(), config.clone()))
        }
        DestinationConfig::Discord(config) => {
            Box::new(discord::DiscordChannel::new(transports.http.clone(), config.clone()))
        }
        DestinationConfig::Webex(config) => {
            Box::new(webex::WebexChannel::new(transports.http.clone(), config.clone()))
        }
        DestinationConfig::Asana(config) => {
            Box::new(asana::AsanaChannel::new(transports.http.clone(), config.clone()))
        }
        DestinationConfig::Datadog(config) => {
            Box::new(datadog::DatadogChannel::new(transports.http.clone(), config.clone()))
        }
        DestinationConfig::Email(config) => {
            Box::new(email::EmailChannel::new(transports.mailer.clone(), config.clone()))
        }
    }
}
