// ABOUTME: Integration tests for the /news and /health endpoints.
// ABOUTME: Drives the router with axum-test against httpmock-backed sources.

use std::time::Duration;

use axum_test::TestServer;
use httpmock::prelude::*;
use newsdesk_scrape::{
    AggregateRequest, Aggregator, ExtractionRule, NewsItem, SelectorSpec, Source, SourceRegistry,
};
use newsdesk_server::{routes, AppState};
use pretty_assertions::assert_eq;

const LISTING: &str = r#"
    <html><body>
    <article>
        <h2><a href="https://news.example/first">First headline</a></h2>
        <img src="https://news.example/first.jpg">
    </article>
    <article>
        <h2><a href="https://news.example/second">Second headline</a></h2>
    </article>
    </body></html>
"#;

fn source(id: &str, url: String) -> Source {
    Source {
        id: id.into(),
        url,
        rule: Some(ExtractionRule {
            container: "article".into(),
            title: SelectorSpec::Css("h2 a".into()),
            link: SelectorSpec::Css("h2 a".into()),
            image: Some(SelectorSpec::Css("img".into())),
            base_url: None,
            max_items: 5,
        }),
        strategy: None,
    }
}

fn state_for(registry: SourceRegistry, request: AggregateRequest) -> AppState {
    let aggregator = Aggregator::builder()
        .registry(registry)
        .allow_private_networks(true)
        .timeout(Duration::from_secs(2))
        .build();
    AppState::new(aggregator, request)
}

#[tokio::test]
async fn news_returns_items_as_json_array() {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path("/feed");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(LISTING);
    })
    .await;

    let registry = SourceRegistry::new(vec![source("example", mock.url("/feed"))]).unwrap();
    let request = AggregateRequest {
        sources: 1,
        limit: 10,
        shuffle: false,
        seed: None,
    };
    let server = TestServer::new(routes(state_for(registry, request))).unwrap();

    let response = server.get("/news").await;
    response.assert_status_ok();
    let items: Vec<NewsItem> = response.json();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "First headline");
    assert_eq!(items[0].source, "example");
    assert!(items[1].image.is_none());
}

#[tokio::test]
async fn news_is_ok_and_empty_on_total_outage() {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path("/gone");
        then.status(502).body("bad gateway");
    })
    .await;

    let registry = SourceRegistry::new(vec![source("gone", mock.url("/gone"))]).unwrap();
    let request = AggregateRequest {
        sources: 1,
        limit: 10,
        shuffle: false,
        seed: None,
    };
    let server = TestServer::new(routes(state_for(registry, request))).unwrap();

    let response = server.get("/news").await;
    response.assert_status_ok();
    let items: Vec<NewsItem> = response.json();
    assert!(items.is_empty());
}

#[tokio::test]
async fn misconfigured_request_is_a_client_error() {
    let mock = MockServer::start_async().await;
    let registry = SourceRegistry::new(vec![source("example", mock.url("/feed"))]).unwrap();
    // sample size zero is a configuration error, not a best-effort pass
    let request = AggregateRequest {
        sources: 0,
        limit: 10,
        shuffle: false,
        seed: None,
    };
    let server = TestServer::new(routes(state_for(registry, request))).unwrap();

    let response = server.get("/news").await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("sources"));
}

#[tokio::test]
async fn health_reports_ok() {
    let mock = MockServer::start_async().await;
    let registry = SourceRegistry::new(vec![source("example", mock.url("/feed"))]).unwrap();
    let server = TestServer::new(routes(state_for(registry, AggregateRequest::default()))).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}
