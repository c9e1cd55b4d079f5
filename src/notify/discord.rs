//! Discord channel-webhook adapter

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::info;

use super::{NotificationChannel, NotifyError, NotifyResult};
use crate::config::DiscordConfig;
use crate::{AlertEvent, State};

const TRIGGERED_COLOR: u32 = 12597547;
const OK_COLOR: u32 = 2600544;

pub struct DiscordChannel {
    client: Client,
    config: DiscordConfig,
}

impl DiscordChannel {
    pub fn new(client: Client, config: DiscordConfig) -> Self {
        Self { client, config }
    }
}

/// Embed payload with Query/Alert/Description fields.
pub fn payload(event: &AlertEvent) -> serde_json::Value {
    let color = if event.new_state == State::Triggered {
        TRIGGERED_COLOR
    } else {
        OK_COLOR
    };

    let mut fields = vec![
        json!({ "name": "Query", "value": event.query_url(), "inline": true }),
        json!({ "name": "Alert", "value": event.alert_url(), "inline": true }),
    ];
    if let Some(body) = &event.body {
        fields.push(json!({ "name": "Description", "value": body }));
    }

    json!({
        "content": event.subject,
        "embeds": [{
            "color": color,
            "fields": fields,
        }]
    })
}

#[async_trait]
impl NotificationChannel for DiscordChannel {
    async fn notify(&self, event: &AlertEvent) -> NotifyResult {
        let response = self
            .client
            .post(&self.config.url)
            .json(&payload(event))
            .send()
            .await?;

        // Discord answers 204 No Content on success
        if response.status() != StatusCode::NO_CONTENT {
            return Err(NotifyError::UnexpectedStatus(response.status().as_u16()));
        }

        info!(alert_id = event.alert_id, "sent Discord notification");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "discord"
    }
}
