//! In-memory alert store (no persistence)
//!
//! Useful for tests and for embedders that have not wired a database
//! behind [`AlertStore`] yet. All data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::backend::AlertStore;
use super::error::{StoreError, StoreResult};
use crate::{AlertDefinition, AlertId, Destination, DestinationId, QueryId, State, Subscription};

#[derive(Default)]
struct Inner {
    alerts: HashMap<AlertId, AlertDefinition>,
    subscriptions: Vec<Subscription>,
    destinations: HashMap<DestinationId, Destination>,
}

/// In-memory [`AlertStore`] backed by a single `RwLock`.
///
/// The whole-map lock makes `commit_transition` trivially atomic: readers
/// either see the previous state or the fully updated one.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_alert(&self, alert: AlertDefinition) {
        self.inner.write().await.alerts.insert(alert.id, alert);
    }

    pub async fn insert_destination(&self, destination: Destination) {
        self.inner
            .write()
            .await
            .destinations
            .insert(destination.id, destination);
    }

    pub async fn insert_subscription(&self, subscription: Subscription) {
        self.inner.write().await.subscriptions.push(subscription);
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn get_alert(&self, alert_id: AlertId) -> StoreResult<Option<AlertDefinition>> {
        Ok(self.inner.read().await.alerts.get(&alert_id).cloned())
    }

    async fn alerts_for_query(&self, query_id: QueryId) -> StoreResult<Vec<AlertDefinition>> {
        let inner = self.inner.read().await;
        let mut alerts: Vec<_> = inner
            .alerts
            .values()
            .filter(|a| a.query_id == query_id)
            .cloned()
            .collect();
        alerts.sort_by_key(|a| a.id);
        Ok(alerts)
    }

    async fn commit_transition(
        &self,
        alert_id: AlertId,
        new_state: State,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let alert = inner
            .alerts
            .get_mut(&alert_id)
            .ok_or(StoreError::AlertNotFound(alert_id))?;

        alert.state = new_state;
        alert.last_triggered_at = Some(now);
        debug!("committed transition of alert {alert_id} to {new_state}");
        Ok(())
    }

    async fn subscriptions_with_destinations(
        &self,
        alert_id: AlertId,
    ) -> StoreResult<Vec<(Subscription, Destination)>> {
        let inner = self.inner.read().await;
        inner
            .subscriptions
            .iter()
            .filter(|s| s.alert_id == alert_id)
            .map(|s| {
                inner
                    .destinations
                    .get(&s.destination_id)
                    .cloned()
                    .map(|d| (s.clone(), d))
                    .ok_or(StoreError::DestinationNotFound(s.destination_id))
            })
            .collect()
    }
}
