//! Per-destination failure isolation within one fan-out

use std::collections::HashMap;
use std::sync::Arc;

use querywatch::State;
use querywatch::config::{DestinationConfig, DiscordConfig, EmailConfig, SlackConfig};
use querywatch::dispatch::DispatchReport;
use querywatch::engine::CheckOutcome;
use querywatch::storage::MemoryStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers;

#[tokio::test]
async fn broken_discord_does_not_block_slack() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/discord"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/slack"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store
        .insert_destination(helpers::destination(
            1,
            "discord ops",
            DestinationConfig::Discord(DiscordConfig {
                url: format!("{}/discord", server.uri()),
            }),
        ))
        .await;
    store
        .insert_destination(helpers::destination(
            2,
            "slack ops",
            DestinationConfig::Slack(SlackConfig {
                url: format!("{}/slack", server.uri()),
            }),
        ))
        .await;
    store.insert_subscription(helpers::subscription(1, 1, 1)).await;
    store.insert_subscription(helpers::subscription(2, 1, 2)).await;
    store.insert_alert(helpers::alert(1, 1, State::Ok)).await;

    let engine = helpers::engine(store, helpers::FakeQueries::new().with_count(1, 50));
    let outcome = engine.check_alert(1, HashMap::new()).await.unwrap();

    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 1, failed: 1 }));
}

#[tokio::test]
async fn unconfigured_mail_transport_only_fails_the_email_destination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/slack"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store
        .insert_destination(helpers::destination(
            1,
            "oncall mail",
            DestinationConfig::Email(EmailConfig {
                addresses: "oncall@example.com".to_string(),
            }),
        ))
        .await;
    store
        .insert_destination(helpers::destination(
            2,
            "slack ops",
            DestinationConfig::Slack(SlackConfig {
                url: format!("{}/slack", server.uri()),
            }),
        ))
        .await;
    store.insert_subscription(helpers::subscription(1, 1, 1)).await;
    store.insert_subscription(helpers::subscription(2, 1, 2)).await;
    store.insert_alert(helpers::alert(1, 1, State::Ok)).await;

    // engine without SMTP configured
    let engine = helpers::engine(store, helpers::FakeQueries::new().with_count(1, 50));
    let outcome = engine.check_alert(1, HashMap::new()).await.unwrap();

    assert_eq!(outcome, CheckOutcome::Notified(DispatchReport { delivered: 1, failed: 1 }));
}
