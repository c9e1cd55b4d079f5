//! Slack incoming-webhook adapter

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use super::{NotificationChannel, NotifyError, NotifyResult};
use crate::config::SlackConfig;
use crate::{AlertEvent, State};

const TRIGGERED_COLOR: &str = "#c0392b";
const OK_COLOR: &str = "#27ae60";

pub struct SlackChannel {
    client: Client,
    config: SlackConfig,
}

impl SlackChannel {
    pub fn new(client: Client, config: SlackConfig) -> Self {
        Self { client, config }
    }
}

/// Attachment payload with the colored bar and Query/Alert/Description
/// fields Slack renders next to the message.
pub fn payload(event: &AlertEvent) -> serde_json::Value {
    let color = if event.new_state == State::Triggered {
        TRIGGERED_COLOR
    } else {
        OK_COLOR
    };

    let mut fields = vec![
        json!({ "title": "Query", "type": "mrkdwn", "value": event.query_url() }),
        json!({ "title": "Alert", "type": "mrkdwn", "value": event.alert_url() }),
    ];
    if let Some(body) = &event.body {
        fields.push(json!({ "title": "Description", "value": body }));
    }

    json!({
        "attachments": [{
            "text": event.subject,
            "color": color,
            "fields": fields,
        }]
    })
}

#[async_trait]
impl NotificationChannel for SlackChannel {
    async fn notify(&self, event: &AlertEvent) -> NotifyResult {
        let response = self
            .client
            .post(&self.config.url)
            .json(&payload(event))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::UnexpectedStatus(response.status().as_u16()));
        }

        info!(alert_id = event.alert_id, "sent Slack notification");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "slack"
    }
}
