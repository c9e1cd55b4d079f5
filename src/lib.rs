pub mod actors;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod evaluator;
pub mod notify;
pub mod policy;
pub mod queries;
pub mod storage;
pub mod util;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DestinationConfig;

pub type AlertId = i64;
pub type QueryId = i64;
pub type DestinationId = i64;
pub type SubscriptionId = i64;

/// Semantic state of an alert.
///
/// Every alert starts out as `Unknown` and moves between `Ok` and
/// `Triggered` as its query produces results. The state is persisted and
/// only ever written through [`crate::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Unknown,
    Ok,
    Triggered,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Unknown => "unknown",
            State::Ok => "ok",
            State::Triggered => "triggered",
        };
        write!(f, "{s}")
    }
}

/// Comparison operator applied between the watched column and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = ">", alias = "greater than")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<", alias = "less than")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "==", alias = "equals")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
}

/// Threshold expression and rendering options of an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertOptions {
    /// Result column the comparison is applied to
    pub column: String,

    pub op: Op,

    /// Threshold value; numbers compare numerically, strings compare for
    /// (in)equality only
    pub value: serde_json::Value,

    /// Overrides the default notification subject when set
    #[serde(default)]
    pub custom_subject: Option<String>,

    /// Optional free-form description included in notifications
    #[serde(default)]
    pub custom_body: Option<String>,
}

/// A monitored condition over a query's latest result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDefinition {
    pub id: AlertId,
    pub name: String,

    /// Query whose latest result this alert evaluates
    pub query_id: QueryId,

    pub options: AlertOptions,

    /// Persisted state; written only by the transition policy
    pub state: State,

    /// Set whenever a notifying transition is committed
    pub last_triggered_at: Option<DateTime<Utc>>,

    /// Cool-down after which a still-triggered alert re-notifies
    pub rearm_seconds: Option<i64>,

    /// Muted alerts still transition but never notify
    #[serde(default)]
    pub muted: bool,
}

impl AlertDefinition {
    /// Subject line used by adapters when no custom subject is configured.
    pub fn default_subject(&self, new_state: State) -> String {
        match new_state {
            State::Triggered => format!("{} just triggered", self.name),
            _ => format!("{} went back to normal", self.name),
        }
    }
}

/// Binds an alert to one destination. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub alert_id: AlertId,
    pub destination_id: DestinationId,

    /// User who created the subscription (for logging/audit)
    pub user: String,
}

/// A named, typed external notification target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    pub config: DestinationConfig,
}

impl Destination {
    /// Stable kind string of the underlying channel (e.g. `"slack"`).
    pub fn kind(&self) -> &'static str {
        self.config.kind()
    }
}

/// Ephemeral value handed to notification adapters. Never persisted.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub alert_id: AlertId,
    pub alert_name: String,

    /// Rendered subject (custom subject or the state-dependent default)
    pub subject: String,

    /// Rendered body, when the alert carries a custom body
    pub body: Option<String>,

    pub query_id: QueryId,
    pub new_state: State,

    /// Base URL used to build deep links into the application
    pub host: String,

    /// Check context, e.g. whether the check was manually triggered
    pub metadata: HashMap<String, String>,
}

impl AlertEvent {
    pub fn query_url(&self) -> String {
        format!("{}/queries/{}", self.host, self.query_id)
    }

    pub fn alert_url(&self) -> String {
        format!("{}/alerts/{}", self.host, self.alert_id)
    }
}
