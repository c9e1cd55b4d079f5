//! Transition and suppression policy
//!
//! The only code path that mutates an alert's persisted `state` and
//! `last_triggered_at`. The decision rule:
//!
//! ```text
//! rearmed       = rearm_seconds set AND last_triggered_at set
//!                 AND (now - last_triggered_at) >= rearm_seconds
//! should_notify = new_state != state
//!                 OR (state == Triggered AND rearmed)
//! ```
//!
//! The transition is committed atomically *before* any dispatch, so a
//! crash mid-fan-out never re-sends stale-state notifications on retry.
//! Two suppressions apply to the notify step only, never to the state
//! write: the first observation settling from `Unknown` to `Ok`, and a
//! muted alert.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::storage::{AlertStore, StoreResult};
use crate::{AlertDefinition, State};

/// Whether a transition to `new_state` at `now` warrants a fan-out.
pub fn should_notify(alert: &AlertDefinition, new_state: State, now: DateTime<Utc>) -> bool {
    let rearmed = match (alert.rearm_seconds, alert.last_triggered_at) {
        (Some(rearm), Some(last)) => now - last >= Duration::seconds(rearm),
        _ => false,
    };

    new_state != alert.state || (alert.state == State::Triggered && rearmed)
}

/// Reason a committed transition still produces no notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// First-ever observation settled straight into `Ok`
    UnknownToOk,

    /// The alert is muted
    Muted,
}

/// Post-commit check: deliberate skips that leave the state write intact.
pub fn notify_suppression(alert: &AlertDefinition, new_state: State) -> Option<Suppression> {
    if alert.state == State::Unknown && new_state == State::Ok {
        debug!(
            alert_id = alert.id,
            "skipping notification (previous state was unknown and now it's ok)"
        );
        return Some(Suppression::UnknownToOk);
    }

    if alert.muted {
        debug!(alert_id = alert.id, "skipping notification (alert muted)");
        return Some(Suppression::Muted);
    }

    None
}

/// Commit the transition through the store.
///
/// Updates `state` and `last_triggered_at` in a single atomic write.
/// Callers must only invoke this when [`should_notify`] returned true;
/// it is the sole mutator of those fields.
pub async fn apply_transition(
    store: &dyn AlertStore,
    alert: &AlertDefinition,
    new_state: State,
    now: DateTime<Utc>,
) -> StoreResult<()> {
    debug!(
        alert_id = alert.id,
        old_state = %alert.state,
        new_state = %new_state,
        "committing state transition"
    );
    store.commit_transition(alert.id, new_state, now).await
}
