//! Dispatch coordinator
//!
//! Fans one committed transition out to every subscribed destination.
//! Destinations fail independently; one broken channel never blocks the
//! others. No retries here: a failed outcome is recorded and left to the
//! job-scheduling layer.

use std::collections::HashMap;

use futures::StreamExt;
use futures::stream;
use tracing::{error, instrument};

use crate::notify::{Transports, channel_for};
use crate::{AlertDefinition, AlertEvent, Destination, State, Subscription};

/// Aggregated outcome of one fan-out, for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Fans alert events out across notification channels.
#[derive(Clone)]
pub struct Dispatcher {
    transports: Transports,
    host: String,

    /// Upper bound on concurrent adapter calls within one dispatch
    fanout_limit: usize,
}

impl Dispatcher {
    pub fn new(transports: Transports, host: String, fanout_limit: usize) -> Self {
        Self {
            transports,
            host,
            // a limit of 0 would stall the stream
            fanout_limit: fanout_limit.max(1),
        }
    }

    /// Render the event all adapters of this dispatch receive.
    pub fn build_event(
        &self,
        alert: &AlertDefinition,
        new_state: State,
        metadata: HashMap<String, String>,
    ) -> AlertEvent {
        let subject = alert
            .options
            .custom_subject
            .clone()
            .unwrap_or_else(|| alert.default_subject(new_state));

        AlertEvent {
            alert_id: alert.id,
            alert_name: alert.name.clone(),
            subject,
            body: alert.options.custom_body.clone(),
            query_id: alert.query_id,
            new_state,
            host: self.host.clone(),
            metadata,
        }
    }

    /// Deliver to every subscribed destination, best-effort, at most once.
    #[instrument(skip_all, fields(alert_id = alert.id, new_state = %new_state))]
    pub async fn dispatch(
        &self,
        alert: &AlertDefinition,
        new_state: State,
        metadata: HashMap<String, String>,
        targets: Vec<(Subscription, Destination)>,
    ) -> DispatchReport {
        let event = self.build_event(alert, new_state, metadata);

        let outcomes: Vec<bool> = stream::iter(targets)
            .map(|(subscription, destination)| {
                let event = event.clone();
                let transports = self.transports.clone();
                async move {
                    let channel = channel_for(&destination, &transports);
                    match channel.notify(&event).await {
                        Ok(()) => true,
                        Err(e) => {
                            error!(
                                destination = channel.kind(),
                                destination_name = %destination.name,
                                alert_id = event.alert_id,
                                subscriber = %subscription.user,
                                "failed to notify destination: {e}"
                            );
                            false
                        }
                    }
                }
            })
            .buffer_unordered(self.fanout_limit)
            .collect()
            .await;

        DispatchReport {
            delivered: outcomes.iter().filter(|ok| **ok).count(),
            failed: outcomes.iter().filter(|ok| !**ok).count(),
        }
    }
}
