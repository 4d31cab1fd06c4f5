use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alexandria_core::config::AlexandriaConfig;
use alexandria_core::models::Severity;
use alexandria_ingest::sources::{
    MetMuseumAdapter, NewsMonitor, SourceAdapter, SourceError, UnescoAdapter,
};

#[tokio::test]
async fn met_adapter_lists_and_fetches_objects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "objectIDs": [101, 102],
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/objects/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectID": 101,
            "title": "The Starry Night",
            "isPublicDomain": true,
            "artistDisplayName": "Vincent van Gogh",
        })))
        .mount(&server)
        .await;

    let adapter = MetMuseumAdapter::with_base_url(server.uri()).unwrap();

    let ids = adapter.list_candidate_ids().await.unwrap();
    assert_eq!(ids, vec!["101", "102"]);

    let payload = adapter.fetch("101").await.unwrap();
    assert_eq!(payload["title"], "The Starry Night");
}

#[tokio::test]
async fn met_adapter_tolerates_empty_object_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 0,
            "objectIDs": null,
        })))
        .mount(&server)
        .await;

    let adapter = MetMuseumAdapter::with_base_url(server.uri()).unwrap();
    let ids = adapter.list_candidate_ids().await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn met_adapter_surfaces_listing_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let adapter = MetMuseumAdapter::with_base_url(server.uri()).unwrap();
    match adapter.list_candidate_ids().await {
        Err(SourceError::Api { code, .. }) => assert_eq!(code, 503),
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unesco_adapter_serves_sites_from_one_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "unique_number": "201",
                "site": "Old City of Aleppo",
                "states": "Syrian Arab Republic",
                "date_inscribed": "1986",
                "danger": "1",
            },
            {
                "unique_number": "202",
                "site": "Bauhaus Sites",
                "states": "Germany",
                "date_inscribed": "1996",
                "danger": "0",
            },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = UnescoAdapter::with_base_url(server.uri()).unwrap();

    let ids = adapter.list_candidate_ids().await.unwrap();
    assert_eq!(ids, vec!["201", "202"]);

    // Both fetches come from the cached listing; the mock expects exactly
    // one upstream call.
    let aleppo = adapter.fetch("201").await.unwrap();
    assert_eq!(aleppo["site"], "Old City of Aleppo");
    let bauhaus = adapter.fetch("202").await.unwrap();
    assert_eq!(bauhaus["danger"], "0");
}

#[tokio::test]
async fn unesco_adapter_refreshes_on_cold_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"unique_number": "300", "site": "Machu Picchu", "states": "Peru"},
        ])))
        .mount(&server)
        .await;

    let adapter = UnescoAdapter::with_base_url(server.uri()).unwrap();
    let site = adapter.fetch("300").await.unwrap();
    assert_eq!(site["site"], "Machu Picchu");

    match adapter.fetch("999").await {
        Err(SourceError::Payload(_)) => {}
        other => panic!("Expected Payload error, got {other:?}"),
    }
}

#[tokio::test]
async fn news_monitor_searches_and_classifies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "museum destroyed"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "articles": [
                {
                    "title": "National museum destroyed in blaze",
                    "description": "Fire swept through the building",
                    "url": "https://example.org/a",
                    "publishedAt": "2024-05-01T00:00:00Z",
                    "source": {"name": "Example Wire"},
                },
                {
                    "title": "Gallery wing damaged by storm",
                    "description": "Repairs expected to take months",
                    "url": "https://example.org/b",
                    "publishedAt": "2024-05-02T00:00:00Z",
                    "source": {"name": "Example Wire"},
                },
            ],
        })))
        .mount(&server)
        .await;

    let mut config = AlexandriaConfig::default();
    config.news.api_key = Some("test-key".to_string());
    config.news.keywords = vec!["museum destroyed".to_string()];
    config.collection.rate_limit_delay_secs = 0.0;

    let monitor = NewsMonitor::with_base_url(&config, server.uri()).unwrap();
    let events = monitor.collect_threats().await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].severity, Severity::High);
    assert_eq!(events[0].threat_type, "museum destroyed");
    assert_eq!(events[0].source, "Example Wire");
    assert_eq!(events[1].severity, Severity::Medium);
}

#[tokio::test]
async fn news_monitor_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let mut config = AlexandriaConfig::default();
    config.news.api_key = Some("wrong-key".to_string());
    config.news.keywords = vec!["art theft".to_string()];
    config.collection.rate_limit_delay_secs = 0.0;

    let monitor = NewsMonitor::with_base_url(&config, server.uri()).unwrap();
    match monitor.collect_threats().await {
        Err(SourceError::Api { code, .. }) => assert_eq!(code, 401),
        other => panic!("Expected Api error, got {other:?}"),
    }
}
