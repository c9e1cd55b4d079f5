//! Interface to the query subsystem.
//!
//! The engine never executes queries itself; it only consumes the most
//! recent result the query subsystem has produced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::QueryId;

/// Most recent result set of a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,

    /// Rows as column-name → value maps; values are opaque JSON
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,

    /// When the query subsystem produced this result
    pub retrieved_at: DateTime<Utc>,
}

impl ResultSet {
    /// Value of `column` in the first row, if present.
    pub fn first_value(&self, column: &str) -> Option<&serde_json::Value> {
        self.rows.first().and_then(|row| row.get(column))
    }
}

/// Read access to the latest results of the query subsystem.
#[async_trait]
pub trait QuerySource: Send + Sync {
    /// Returns the latest result of `query_id`, or `None` when the query
    /// has never produced one.
    async fn latest_result(&self, query_id: QueryId) -> anyhow::Result<Option<ResultSet>>;
}
