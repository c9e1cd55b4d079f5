//! Shared helpers for integration tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use querywatch::config::EngineConfig;
use querywatch::engine::Engine;
use querywatch::queries::{QuerySource, ResultSet};
use querywatch::storage::MemoryStore;
use querywatch::{
    AlertDefinition, AlertId, AlertOptions, Destination, DestinationId, Op, QueryId, State,
    Subscription, SubscriptionId,
};
use serde_json::json;

/// Query subsystem stub with a fixed latest result per query.
pub struct FakeQueries {
    results: HashMap<QueryId, ResultSet>,
}

impl FakeQueries {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
        }
    }

    pub fn with_count(mut self, query_id: QueryId, count: i64) -> Self {
        let row = json!({ "count": count }).as_object().unwrap().clone();
        self.results.insert(
            query_id,
            ResultSet {
                columns: vec!["count".to_string()],
                rows: vec![row],
                retrieved_at: Utc::now(),
            },
        );
        self
    }
}

#[async_trait]
impl QuerySource for FakeQueries {
    async fn latest_result(&self, query_id: QueryId) -> anyhow::Result<Option<ResultSet>> {
        Ok(self.results.get(&query_id).cloned())
    }
}

pub fn alert(id: AlertId, query_id: QueryId, state: State) -> AlertDefinition {
    AlertDefinition {
        id,
        name: "rows over limit".to_string(),
        query_id,
        options: AlertOptions {
            column: "count".to_string(),
            op: Op::GreaterThan,
            value: json!(10),
            custom_subject: None,
            custom_body: None,
        },
        state,
        last_triggered_at: None,
        rearm_seconds: None,
        muted: false,
    }
}

pub fn subscription(
    id: SubscriptionId,
    alert_id: AlertId,
    destination_id: DestinationId,
) -> Subscription {
    Subscription {
        id,
        alert_id,
        destination_id,
        user: "ops".to_string(),
    }
}

pub fn destination(
    id: DestinationId,
    name: &str,
    config: querywatch::config::DestinationConfig,
) -> Destination {
    Destination {
        id,
        name: name.to_string(),
        config,
    }
}

/// Engine over a memory store and fake query source, links pointing at
/// the canonical test host.
pub fn engine(store: Arc<MemoryStore>, queries: FakeQueries) -> Engine {
    Engine::new(
        store,
        Arc::new(queries),
        EngineConfig {
            host: "https://localhost:5000".to_string(),
            ..EngineConfig::default()
        },
    )
    .expect("engine construction")
}
