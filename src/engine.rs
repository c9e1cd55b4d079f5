//! Check pipeline and engine context
//!
//! The [`Engine`] is the explicitly constructed context object holding the
//! store, the query subsystem handle and the outbound transports. One
//! engine is created at startup and shared across check jobs; there is no
//! process-global state.
//!
//! A check of one alert runs evaluate → transition-commit → dispatch
//! end-to-end under a per-alert-id lock, so a manual trigger racing a
//! scheduled run of the *same* alert cannot interleave partial updates.
//! Checks of distinct alerts run fully concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::config::EngineConfig;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::notify::{Transports, email::Mailer};
use crate::policy::{self, Suppression};
use crate::queries::QuerySource;
use crate::storage::AlertStore;
use crate::{AlertId, QueryId, evaluator};

/// Result of checking a single alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// State unchanged (and no re-arm due); nothing committed
    Unchanged,

    /// Transition committed, notification deliberately skipped
    Suppressed(Suppression),

    /// Transition committed and fanned out
    Notified(DispatchReport),
}

/// Aggregate of one query-level check job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub checked: usize,
    pub notified: usize,
    pub suppressed: usize,
    pub unchanged: usize,
}

/// Shared context for alert evaluation and dispatch.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn AlertStore>,
    queries: Arc<dyn QuerySource>,
    dispatcher: Dispatcher,

    /// Serializes concurrent checks of the same alert
    locks: Arc<Mutex<HashMap<AlertId, Arc<Mutex<()>>>>>,
}

impl Engine {
    pub fn new(
        store: Arc<dyn AlertStore>,
        queries: Arc<dyn QuerySource>,
        config: EngineConfig,
    ) -> anyhow::Result<Self> {
        let mailer = config
            .smtp
            .as_ref()
            .map(Mailer::from_config)
            .transpose()
            .context("failed to build SMTP transport")?;

        let transports = Transports::new(Duration::from_secs(config.timeout_secs), mailer)?;
        let dispatcher = Dispatcher::new(transports, config.host, config.fanout_limit);

        Ok(Self {
            store,
            queries,
            dispatcher,
            locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    async fn lock_for(&self, alert_id: AlertId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(alert_id).or_default().clone()
    }

    /// Job entry point: evaluate every alert attached to `query_id`.
    ///
    /// Invoked by the job scheduler after a query produced a fresh result.
    /// Retry/backoff on error is the scheduler's responsibility.
    #[instrument(skip(self, metadata))]
    pub async fn check_query(
        &self,
        query_id: QueryId,
        metadata: HashMap<String, String>,
    ) -> anyhow::Result<CheckSummary> {
        debug!("checking query {query_id} for alerts");

        let alerts = self.store.alerts_for_query(query_id).await?;
        let mut summary = CheckSummary::default();

        for alert in alerts {
            info!("checking alert ({}) of query {query_id}", alert.id);
            let outcome = self.check_alert(alert.id, metadata.clone()).await?;

            summary.checked += 1;
            match outcome {
                CheckOutcome::Unchanged => summary.unchanged += 1,
                CheckOutcome::Suppressed(_) => summary.suppressed += 1,
                CheckOutcome::Notified(_) => summary.notified += 1,
            }
        }

        Ok(summary)
    }

    /// Evaluate one alert and, when warranted, commit the transition and
    /// fan out notifications.
    ///
    /// The transition is committed before any notification goes out, so a
    /// crash mid-fan-out never re-sends stale-state notifications when the
    /// job is retried.
    #[instrument(skip(self, metadata))]
    pub async fn check_alert(
        &self,
        alert_id: AlertId,
        metadata: HashMap<String, String>,
    ) -> anyhow::Result<CheckOutcome> {
        let lock = self.lock_for(alert_id).await;
        let _guard = lock.lock().await;

        // re-read under the lock: a racing check may have transitioned us
        let alert = self
            .store
            .get_alert(alert_id)
            .await?
            .with_context(|| format!("alert {alert_id} not found"))?;

        let latest_result = self.queries.latest_result(alert.query_id).await?;
        let new_state = evaluator::evaluate(&alert, latest_result.as_ref());

        let now = chrono::Utc::now();
        if !policy::should_notify(&alert, new_state, now) {
            return Ok(CheckOutcome::Unchanged);
        }

        info!("alert {} new state: {new_state}", alert.id);
        policy::apply_transition(self.store.as_ref(), &alert, new_state, now).await?;

        if let Some(suppression) = policy::notify_suppression(&alert, new_state) {
            return Ok(CheckOutcome::Suppressed(suppression));
        }

        let targets = self.store.subscriptions_with_destinations(alert.id).await?;
        let report = self
            .dispatcher
            .dispatch(&alert, new_state, metadata, targets)
            .await;

        Ok(CheckOutcome::Notified(report))
    }
}
