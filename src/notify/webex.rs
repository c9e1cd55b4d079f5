//! Webex messages-API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use super::{NotificationChannel, NotifyError, NotifyResult};
use crate::AlertEvent;
use crate::config::WebexConfig;

pub struct WebexChannel {
    client: Client,
    config: WebexConfig,
}

impl WebexChannel {
    pub fn new(client: Client, config: WebexConfig) -> Self {
        Self { client, config }
    }
}

/// Markdown message plus an adaptive card with the deep links.
pub fn payload(event: &AlertEvent, room_id: &str) -> serde_json::Value {
    let markdown = match &event.body {
        Some(body) => format!("{}\n\n{}", event.subject, body),
        None => event.subject.clone(),
    };

    let card = json!({
        "contentType": "application/vnd.microsoft.card.adaptive",
        "content": {
            "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
            "type": "AdaptiveCard",
            "version": "1.0",
            "body": [
                {
                    "type": "TextBlock",
                    "text": event.subject,
                    "weight": "bolder",
                    "size": "medium",
                    "wrap": true,
                },
                {
                    "type": "FactSet",
                    "facts": [
                        { "title": "Query", "value": event.query_url() },
                        { "title": "Alert", "value": event.alert_url() },
                    ],
                },
            ],
        },
    });

    json!({
        "roomId": room_id,
        "markdown": markdown,
        "attachments": [card],
    })
}

#[async_trait]
impl NotificationChannel for WebexChannel {
    async fn notify(&self, event: &AlertEvent) -> NotifyResult {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_token)
            .json(&payload(event, &self.config.room_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::UnexpectedStatus(response.status().as_u16()));
        }

        info!(alert_id = event.alert_id, "sent Webex message");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "webex"
    }
}
