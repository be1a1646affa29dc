//! Google Books adapter tests
//!
//! Uses wiremock to check request formatting, response parsing and how
//! HTTP failures map onto `LookupError`.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::books::{BookLookup, Candidate, GoogleBooksClient, LookupError};

const VOLUMES_PATH: &str = "/books/v1/volumes";

fn client(server: &MockServer) -> GoogleBooksClient {
    GoogleBooksClient::new(server.uri(), 5)
}

// =============================================================================
// Request formatting
// =============================================================================

#[tokio::test]
async fn test_search_sends_query_and_limits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .and(query_param("q", "the left hand of darkness"))
        .and(query_param("printType", "books"))
        .and(query_param("maxResults", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .search("the left hand of darkness", CancellationToken::new())
        .await;
    assert_eq!(result, Ok(vec![]));
}

// =============================================================================
// Response parsing
// =============================================================================

#[tokio::test]
async fn test_search_parses_and_normalizes_volumes() {
    let server = MockServer::start().await;

    let body = json!({
        "items": [{
            "id": "B1hSG45JCX4C",
            "volumeInfo": {
                "title": "Dune",
                "authors": ["Frank Herbert"],
                "pageCount": 412,
                "industryIdentifiers": [
                    { "type": "ISBN_10", "identifier": "0441013597" },
                    { "type": "ISBN_13", "identifier": "9780441013593" }
                ]
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let volumes = client(&server)
        .search("dune", CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(volumes.len(), 1);

    let candidate = Candidate::from_raw(volumes[0].clone(), "dune");
    assert_eq!(candidate.title, "Dune");
    assert_eq!(candidate.authors, vec!["Frank Herbert".to_string()]);
    assert_eq!(candidate.page_count, Some(412));
    assert_eq!(candidate.isbn.as_deref(), Some("9780441013593"));
    assert_eq!(candidate.external_id, "B1hSG45JCX4C");
    assert_eq!(
        candidate.cover_url,
        "https://covers.openlibrary.org/b/isbn/9780441013593-M.jpg"
    );
}

#[tokio::test]
async fn test_missing_items_means_no_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "books#volumes", "totalItems": 0 })))
        .mount(&server)
        .await;

    let result = client(&server).search("zzzzqx", CancellationToken::new()).await;
    assert_eq!(result, Ok(vec![]));
}

#[tokio::test]
async fn test_sparse_volume_fields_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "x1", "volumeInfo": {} }, { "id": "x2" }]
        })))
        .mount(&server)
        .await;

    let volumes = client(&server)
        .search("sparse", CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(volumes.len(), 2);
    assert!(volumes[0].volume_info.title.is_none());
    assert!(volumes[1].volume_info.authors.is_empty());
}

// =============================================================================
// Error handling
// =============================================================================

#[tokio::test]
async fn test_server_error_maps_to_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client(&server).search("dune", CancellationToken::new()).await;
    assert_eq!(result, Err(LookupError::Service { status: 500 }));
}

#[tokio::test]
async fn test_rate_limit_maps_to_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = client(&server).search("dune", CancellationToken::new()).await;
    assert_eq!(result, Err(LookupError::Service { status: 429 }));
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client(&server).search("dune", CancellationToken::new()).await;
    assert!(matches!(result, Err(LookupError::Decode(_))));
}

#[tokio::test]
async fn test_connection_refused_maps_to_network() {
    // Nothing listens on the discard port.
    let client = GoogleBooksClient::new("http://127.0.0.1:9", 5);
    let result = client.search("dune", CancellationToken::new()).await;
    assert!(matches!(result, Err(LookupError::Network(_))));
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_cancel_abandons_slow_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client(&server).search("dune", token),
    )
    .await
    .expect("cancellation should end the request well before the response");
    assert_eq!(result, Err(LookupError::Cancelled));
}
