//! Datadog events-API adapter

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::info;

use super::{NotificationChannel, NotifyError, NotifyResult};
use crate::config::DatadogConfig;
use crate::{AlertEvent, State};

pub struct DatadogChannel {
    client: Client,
    config: DatadogConfig,
}

impl DatadogChannel {
    pub fn new(client: Client, config: DatadogConfig) -> Self {
        Self { client, config }
    }
}

/// Event payload; the aggregation key groups re-notifications of the
/// same alert on the Datadog side.
pub fn payload(event: &AlertEvent, config: &DatadogConfig) -> serde_json::Value {
    let alert_type = if event.new_state == State::Triggered {
        "error"
    } else {
        "success"
    };

    let mut tags: Vec<String> = config
        .tags
        .as_deref()
        .map(|tags| tags.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    tags.push("redash".to_string());
    tags.push(format!("query_id:{}", event.query_id));
    tags.push(format!("alert_id:{}", event.alert_id));

    let text = event
        .body
        .clone()
        .unwrap_or_else(|| format!("Alert: {}, Query: {}", event.alert_url(), event.query_url()));

    json!({
        "title": event.subject,
        "text": text,
        "alert_type": alert_type,
        "priority": config.priority.as_deref().unwrap_or("normal"),
        "source_type_name": "redash",
        "aggregation_key": format!("redash:{}", event.alert_url()),
        "tags": tags,
    })
}

#[async_trait]
impl NotificationChannel for DatadogChannel {
    async fn notify(&self, event: &AlertEvent) -> NotifyResult {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("DD-API-KEY", &self.config.api_key)
            .json(&payload(event, &self.config))
            .send()
            .await?;

        // The events API acknowledges with 202 Accepted
        if response.status() != StatusCode::ACCEPTED {
            return Err(NotifyError::UnexpectedStatus(response.status().as_u16()));
        }

        info!(alert_id = event.alert_id, "sent Datadog event");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "datadog"
    }
}
