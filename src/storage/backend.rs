//! Alert store trait definition

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StoreResult;
use crate::{AlertDefinition, AlertId, Destination, QueryId, State, Subscription};

/// Persistence operations the evaluation core depends on.
///
/// Implementations must be `Send + Sync` as they are shared across
/// concurrently running check jobs.
///
/// ## Atomicity
///
/// `commit_transition` is the only write path for `state` and
/// `last_triggered_at` and must apply both fields in one commit. A failed
/// commit must leave the previous values untouched; callers treat the
/// error as a job failure eligible for retry at the scheduling layer.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Fetch a single alert definition.
    async fn get_alert(&self, alert_id: AlertId) -> StoreResult<Option<AlertDefinition>>;

    /// All alerts attached to a query, in id order.
    async fn alerts_for_query(&self, query_id: QueryId) -> StoreResult<Vec<AlertDefinition>>;

    /// Atomically write `state` and `last_triggered_at` for one alert.
    async fn commit_transition(
        &self,
        alert_id: AlertId,
        new_state: State,
        now: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Subscriptions of an alert joined with their destinations, in
    /// subscription order.
    async fn subscriptions_with_destinations(
        &self,
        alert_id: AlertId,
    ) -> StoreResult<Vec<(Subscription, Destination)>>;
}
