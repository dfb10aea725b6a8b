//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use spasite_places::{PlacesClient, PlacesError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url(base_url, 5).expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_reviews_returns_parsed_reviews() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "reviews": [
            {
                "author_name": "Jane Doe",
                "rating": 5,
                "relative_time_description": "2024-03-01T10:00:00Z",
                "text": "Lovely massage"
            },
            {
                "author_name": "John Smith",
                "rating": 2,
                "relative_time_description": "2024-02-01T10:00:00Z",
                "text": "Too short"
            }
        ],
        "places_reviews": { "totalReviewCount": 212, "averageRating": "4.8" }
    });

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let payload = test_client(&server.uri())
        .fetch_reviews()
        .await
        .expect("should parse reviews");

    assert_eq!(payload.reviews.len(), 2);
    assert_eq!(payload.reviews[0].author_name, "Jane Doe");
    assert_eq!(payload.reviews[1].rating, Some(2));
    assert_eq!(payload.total_review_count, Some(212));
    assert_eq!(payload.average_rating.as_deref(), Some("4.8"));
}

#[tokio::test]
async fn fetch_reviews_tolerates_missing_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "reviews": [{ "author_name": "Anon" }]
        })))
        .mount(&server)
        .await;

    let payload = test_client(&server.uri()).fetch_reviews().await.unwrap();
    assert_eq!(payload.reviews[0].rating, None);
    assert!(payload.reviews[0].text.is_empty());
    assert_eq!(payload.total_review_count, None);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_reviews().await.unwrap_err();
    assert!(
        matches!(err, PlacesError::UnexpectedStatus { status: 503, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_reviews().await.unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }));
}

#[tokio::test]
async fn fetch_hours_parses_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hours"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "regularHours": [
                { "day": "Monday", "open": "10:00", "close": "20:00" },
                { "day": "Sunday", "closed": true }
            ],
            "specialHours": [
                { "date": "2026-12-24", "closed": false, "close": "15:00" },
                { "date": "2026-12-25", "closed": true }
            ],
            "updatedAt": "2026-10-01T09:00:00Z"
        })))
        .mount(&server)
        .await;

    let hours = test_client(&server.uri()).fetch_hours().await.unwrap();
    assert_eq!(hours.regular_hours.len(), 2);
    assert!(hours.regular_hours[1].closed);
    assert_eq!(hours.special_hours[0].close.as_deref(), Some("15:00"));
    assert_eq!(hours.updated_at.as_deref(), Some("2026-10-01T09:00:00Z"));
}
