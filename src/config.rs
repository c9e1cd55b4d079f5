use tracing::trace;

/// Typed configuration for one notification destination.
///
/// The variant tag is the destination kind as stored by the administrative
/// layer; unknown kinds are rejected when the configuration is deserialized,
/// not when a notification is attempted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DestinationConfig {
    Email(EmailConfig),
    Slack(SlackConfig),
    Discord(DiscordConfig),
    Webex(WebexConfig),
    Asana(AsanaConfig),
    Datadog(DatadogConfig),
}

impl DestinationConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            DestinationConfig::Email(_) => "email",
            DestinationConfig::Slack(_) => "slack",
            DestinationConfig::Discord(_) => "discord",
            DestinationConfig::Webex(_) => "webex",
            DestinationConfig::Asana(_) => "asana",
            DestinationConfig::Datadog(_) => "datadog",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EmailConfig {
    /// Comma-separated list of recipient addresses
    pub addresses: String,
}

impl EmailConfig {
    pub fn recipients(&self) -> Vec<&str> {
        self.addresses
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SlackConfig {
    /// Incoming webhook URL (the URL itself is the secret)
    pub url: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DiscordConfig {
    /// Channel webhook URL
    pub url: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WebexConfig {
    pub api_token: String,
    pub room_id: String,

    /// Overridable for tests; defaults to the public Webex API
    #[serde(default = "default_webex_endpoint")]
    pub endpoint: String,
}

fn default_webex_endpoint() -> String {
    "https://webexapis.com/v1/messages".to_string()
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AsanaConfig {
    pub personal_access_token: String,
    pub project_id: String,

    #[serde(default = "default_asana_endpoint")]
    pub endpoint: String,
}

fn default_asana_endpoint() -> String {
    "https://app.asana.com/api/1.0/tasks".to_string()
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatadogConfig {
    pub api_key: String,

    /// Comma-separated user tags appended to every event
    #[serde(default)]
    pub tags: Option<String>,

    /// Event priority (`normal` or `low`)
    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default = "default_datadog_endpoint")]
    pub endpoint: String,
}

fn default_datadog_endpoint() -> String {
    "https://api.datadoghq.com/api/v1/events".to_string()
}

/// SMTP transport settings for the email adapter.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

fn default_smtp_port() -> u16 {
    587
}

/// Engine-level configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Base URL used to build deep links in notifications
    pub host: String,

    /// Maximum concurrent adapter calls within one dispatch
    #[serde(default = "default_fanout_limit")]
    pub fanout_limit: usize,

    /// Outbound HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// SMTP transport; email destinations fail to send without it
    pub smtp: Option<SmtpConfig>,
}

fn default_fanout_limit() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: crate::util::get_host(),
            fanout_limit: default_fanout_limit(),
            timeout_secs: default_timeout_secs(),
            smtp: None,
        }
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<EngineConfig> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
