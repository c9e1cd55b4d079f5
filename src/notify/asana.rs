//! Asana task-creation adapter

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use super::{NotificationChannel, NotifyError, NotifyResult};
use crate::config::AsanaConfig;
use crate::{AlertEvent, State};

pub struct AsanaChannel {
    client: Client,
    config: AsanaConfig,
}

impl AsanaChannel {
    pub fn new(client: Client, config: AsanaConfig) -> Self {
        Self { client, config }
    }
}

/// Plain-text note for the created task.
pub fn notes(event: &AlertEvent) -> String {
    let state = if event.new_state == State::Triggered {
        "TRIGGERED"
    } else {
        "OK"
    };

    format!(
        "Alert: {name}\nState: {state}\nQuery: {query}\nAlert link: {alert}",
        name = event.alert_name,
        state = state,
        query = event.query_url(),
        alert = event.alert_url(),
    )
}

pub fn payload(event: &AlertEvent, project_id: &str) -> serde_json::Value {
    json!({
        "data": {
            "name": event.subject,
            "notes": notes(event),
            "projects": [project_id],
        }
    })
}

#[async_trait]
impl NotificationChannel for AsanaChannel {
    async fn notify(&self, event: &AlertEvent) -> NotifyResult {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.personal_access_token)
            .json(&payload(event, &self.config.project_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::UnexpectedStatus(response.status().as_u16()));
        }

        info!(alert_id = event.alert_id, "created Asana task");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "asana"
    }
}
