//! Exact outbound payloads and success signals per provider

use std::collections::HashMap;
use std::sync::Arc;

use querywatch::State;
use querywatch::config::{
    AsanaConfig, DatadogConfig, DestinationConfig, DiscordConfig, SlackConfig, WebexConfig,
};
use querywatch::dispatch::DispatchReport;
use querywatch::engine::CheckOutcome;
use querywatch::storage::MemoryStore;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers;

async fn check_with_destination(
    server_config: DestinationConfig,
    customize: impl FnOnce(&mut querywatch::AlertDefinition),
) -> CheckOutcome {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_destination(helpers::destination(1, "target", server_config))
        .await;
    store.insert_subscription(helpers::subscription(1, 1, 1)).await;

    let mut alert = helpers::alert(1, 1, State::Ok);
    customize(&mut alert);
    store.insert_alert(alert).await;

    let engine = helpers::engine(store, helpers::FakeQueries::new().with_count(1, 50));
    engine.check_alert(1, HashMap::new()).await.unwrap()
}

#[tokio::test]
async fn slack_payload_is_byte_exact() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "attachments": [{
                "text": "Test custom subject",
                "color": "#c0392b",
                "fields": [
                    { "title": "Query", "type": "mrkdwn", "value": "https://localhost:5000/queries/1" },
                    { "title": "Alert", "type": "mrkdwn", "value": "https://localhost:5000/alerts/1" },
                    { "title": "Description", "value": "Test custom body" },
                ],
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_with_destination(
        DestinationConfig::Slack(SlackConfig {
            url: format!("{}/hook", server.uri()),
        }),
        |alert| {
            alert.options.custom_subject = Some("Test custom subject".to_string());
            alert.options.custom_body = Some("Test custom body".to_string());
        },
    )
    .await;

    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 1, failed: 0 }));
}

#[tokio::test]
async fn datadog_payload_tags_and_aggregation_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/events"))
        .and(header("DD-API-KEY", "my-api-key"))
        .and(body_json(json!({
            "title": "rows over limit just triggered",
            "text": "Alert: https://localhost:5000/alerts/1, Query: https://localhost:5000/queries/1",
            "alert_type": "error",
            "priority": "normal",
            "source_type_name": "redash",
            "aggregation_key": "redash:https://localhost:5000/alerts/1",
            "tags": ["foo:bar", "zoo:baz", "redash", "query_id:1", "alert_id:1"],
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_with_destination(
        DestinationConfig::Datadog(DatadogConfig {
            api_key: "my-api-key".to_string(),
            tags: Some("foo:bar,zoo:baz".to_string()),
            priority: None,
            endpoint: format!("{}/api/v1/events", server.uri()),
        }),
        |_| {},
    )
    .await;

    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 1, failed: 0 }));
}

#[tokio::test]
async fn datadog_treats_non_202_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_with_destination(
        DestinationConfig::Datadog(DatadogConfig {
            api_key: "my-api-key".to_string(),
            tags: None,
            priority: None,
            endpoint: format!("{}/api/v1/events", server.uri()),
        }),
        |_| {},
    )
    .await;

    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 0, failed: 1 }));
}

#[tokio::test]
async fn discord_requires_204_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_with_destination(
        DestinationConfig::Discord(DiscordConfig {
            url: format!("{}/ok", server.uri()),
        }),
        |_| {},
    )
    .await;
    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 1, failed: 0 }));

    // a 200 from Discord is not a success signal
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_with_destination(
        DestinationConfig::Discord(DiscordConfig { url: server.uri() }),
        |_| {},
    )
    .await;
    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 0, failed: 1 }));
}

#[tokio::test]
async fn webex_targets_room_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("authorization", "Bearer token-123"))
        .and(body_partial_json(json!({ "roomId": "room-42" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_with_destination(
        DestinationConfig::Webex(WebexConfig {
            api_token: "token-123".to_string(),
            room_id: "room-42".to_string(),
            endpoint: format!("{}/v1/messages", server.uri()),
        }),
        |_| {},
    )
    .await;

    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 1, failed: 0 }));
}

#[tokio::test]
async fn asana_creates_task_in_configured_project() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/1.0/tasks"))
        .and(header("authorization", "Bearer pat-1"))
        .and(body_partial_json(json!({
            "data": {
                "name": "rows over limit just triggered",
                "projects": ["proj-7"],
            }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = check_with_destination(
        DestinationConfig::Asana(AsanaConfig {
            personal_access_token: "pat-1".to_string(),
            project_id: "proj-7".to_string(),
            endpoint: format!("{}/api/1.0/tasks", server.uri()),
        }),
        |_| {},
    )
    .await;

    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 1, failed: 0 }));
}
