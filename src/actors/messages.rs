//! Message types for actor communication

use std::collections::HashMap;

use tokio::sync::oneshot;

use crate::QueryId;
use crate::engine::CheckSummary;

/// Commands that can be sent to the CheckerActor
#[derive(Debug)]
pub enum CheckCommand {
    /// Evaluate all alerts of a query against its latest result
    CheckQuery {
        query_id: QueryId,

        /// Check context forwarded into notifications (e.g. whether the
        /// check was manually triggered)
        metadata: HashMap<String, String>,

        /// Channel to send the result back
        respond_to: oneshot::Sender<anyhow::Result<CheckSummary>>,
    },

    /// Gracefully shut down the checker actor
    Shutdown,
}
