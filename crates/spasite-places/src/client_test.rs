use super::*;

#[test]
fn with_base_url_derives_both_endpoints() {
    let client = PlacesClient::with_base_url("https://places.example.com/api/", 30)
        .expect("client construction should not fail");
    assert_eq!(
        client.reviews_url.as_str(),
        "https://places.example.com/api/reviews"
    );
    assert_eq!(
        client.hours_url.as_str(),
        "https://places.example.com/api/hours"
    );
}

#[test]
fn explicit_endpoints_are_kept_verbatim() {
    let client = PlacesClient::new(
        "https://reviews.example.com/v1/list?place=abc",
        "https://hours.example.com/today",
        5,
    )
    .expect("client construction should not fail");
    assert_eq!(
        client.reviews_url.as_str(),
        "https://reviews.example.com/v1/list?place=abc"
    );
}

#[test]
fn relative_url_is_rejected() {
    let result = PlacesClient::new("/reviews", "https://hours.example.com", 5);
    assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
}
