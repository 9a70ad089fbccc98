//! Tests for fact fetching against a local fixture server.

use async_trait::async_trait;
use axum::{Json, Router, http::StatusCode, routing::get};
use cat_facts_game::{
    CatFactClient, FALLBACK_FACTS, Fact, FactBatch, FactFeed, FactProvider, FactSource,
    FactSourceError, StaticFacts,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn facts_page() -> Json<Value> {
    Json(json!({
        "current_page": 1,
        "data": [
            { "fact": "Cats sleep most of the night", "length": 28 },
            { "fact": "Dogs bark loudly", "length": 16 }
        ]
    }))
}

async fn empty_page() -> Json<Value> {
    Json(json!({ "data": [] }))
}

async fn no_data() -> Json<Value> {
    Json(json!({ "current_page": 1 }))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Serves the fixture routes on an ephemeral port and returns the base URL.
async fn spawn_fixture() -> String {
    let app = Router::new()
        .route("/facts", get(facts_page))
        .route("/empty", get(empty_page))
        .route("/nodata", get(no_data))
        .route("/broken", get(broken));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fixture");
    let addr = listener.local_addr().expect("Fixture has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fixture server failed");
    });
    format!("http://{}", addr)
}

fn is_fallback(batch: &FactBatch) -> bool {
    batch.len() == FALLBACK_FACTS.len()
        && batch
            .iter()
            .zip(FALLBACK_FACTS)
            .all(|(fact, text)| fact.text() == text)
}

#[tokio::test]
async fn test_client_parses_facts_page() {
    let base = spawn_fixture().await;
    let client = CatFactClient::new(format!("{}/facts?limit=2", base), TIMEOUT)
        .expect("Client builds");
    let batch = client.fetch().await.expect("Fetch succeeds");

    assert_eq!(batch.len(), 2);
    let first = batch.get(0).expect("Has a first fact");
    assert_eq!(first.text(), "Cats sleep most of the night");
    assert_eq!(first.length(), 28);
}

#[tokio::test]
async fn test_client_reports_http_error() {
    let base = spawn_fixture().await;
    let client = CatFactClient::new(format!("{}/broken", base), TIMEOUT).expect("Client builds");
    let err = client.fetch().await.expect_err("500 must fail");
    assert!(err.message.contains("HTTP error"), "{}", err);
}

#[tokio::test]
async fn test_client_rejects_missing_data() {
    let base = spawn_fixture().await;
    let client = CatFactClient::new(format!("{}/nodata", base), TIMEOUT).expect("Client builds");
    assert!(client.fetch().await.is_err());
}

#[tokio::test]
async fn test_feed_falls_back_on_http_error() {
    let base = spawn_fixture().await;
    let client = CatFactClient::new(format!("{}/broken", base), TIMEOUT).expect("Client builds");
    let mut feed = FactFeed::new(client, Duration::from_secs(60));

    let batch = feed.load().await;
    assert!(is_fallback(&batch));
    assert!(!feed.is_fresh());
}

#[tokio::test]
async fn test_feed_falls_back_on_empty_page() {
    let base = spawn_fixture().await;
    let client = CatFactClient::new(format!("{}/empty", base), TIMEOUT).expect("Client builds");
    let mut feed = FactFeed::new(client, Duration::from_secs(60));
    assert!(is_fallback(&feed.load().await));
}

#[tokio::test]
async fn test_feed_falls_back_on_unreachable_host() {
    // Port 9 (discard) on localhost is not expected to be listening.
    let client = CatFactClient::new("http://127.0.0.1:9/facts", Duration::from_secs(1))
        .expect("Client builds");
    let mut feed = FactFeed::new(client, Duration::from_secs(60));
    assert!(is_fallback(&feed.load().await));
}

/// Counts fetches and serves a fixed batch.
#[derive(Debug, Clone)]
struct CountingProvider {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl FactProvider for CountingProvider {
    async fn fetch(&self) -> Result<FactBatch, FactSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FactSourceError::new("offline"));
        }
        Ok(FactBatch::new(vec![Fact::from_text("Kittens purr")]))
    }
}

#[tokio::test]
async fn test_feed_caches_while_fresh() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        calls: calls.clone(),
        fail: false,
    };
    let mut feed = FactFeed::new(provider, Duration::from_secs(3600));

    let first = feed.load().await;
    let second = feed.load().await;
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(feed.is_fresh());
    assert_eq!(feed.batch(), first);
}

#[tokio::test]
async fn test_feed_refetches_when_stale() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        calls: calls.clone(),
        fail: false,
    };
    let mut feed = FactFeed::new(provider, Duration::ZERO);

    feed.load().await;
    feed.load().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_feed_retries_after_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        calls: calls.clone(),
        fail: true,
    };
    let mut feed = FactFeed::new(provider, Duration::from_secs(3600));

    assert!(is_fallback(&feed.load().await));
    assert!(is_fallback(&feed.load().await));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(is_fallback(&feed.batch()));
}

#[tokio::test]
async fn test_static_facts() {
    let batch = StaticFacts.fetch().await.expect("Static facts never fail");
    assert!(is_fallback(&batch));
    assert!(batch.iter().all(|fact| fact.length() == fact.text().chars().count()));
}

#[tokio::test]
async fn test_boxed_provider_feeds_and_caches() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider: Box<dyn FactProvider> = Box::new(CountingProvider {
        calls: calls.clone(),
        fail: false,
    });
    let mut feed = FactFeed::new(provider, Duration::from_secs(3600));

    let batch = feed.load().await;
    assert_eq!(batch.get(0).map(|fact| fact.text()), Some("Kittens purr"));
    feed.load().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
