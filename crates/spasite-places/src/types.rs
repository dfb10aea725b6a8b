//! Wire types for the external review source.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use spasite_core::RawReview;

/// Reviews plus aggregate stats, normalized from either payload shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewsPayload {
    pub reviews: Vec<RawReview>,
    pub total_review_count: Option<u64>,
    pub average_rating: Option<String>,
}

/// The source has been seen to put the aggregates both under
/// `places_reviews` and at the top level.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewsEnvelope {
    #[serde(default)]
    pub reviews: Vec<RawReview>,
    #[serde(default, rename = "places_reviews")]
    pub places_reviews: Option<Aggregates>,
    #[serde(default, deserialize_with = "count")]
    pub total_review_count: Option<u64>,
    #[serde(default, deserialize_with = "rating")]
    pub average_rating: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Aggregates {
    #[serde(default, deserialize_with = "count")]
    pub total_review_count: Option<u64>,
    #[serde(default, deserialize_with = "rating")]
    pub average_rating: Option<String>,
}

impl From<ReviewsEnvelope> for ReviewsPayload {
    fn from(envelope: ReviewsEnvelope) -> Self {
        let nested = envelope.places_reviews.unwrap_or_default();
        Self {
            reviews: envelope.reviews,
            total_review_count: nested.total_review_count.or(envelope.total_review_count),
            average_rating: nested.average_rating.or(envelope.average_rating),
        }
    }
}

/// Accepts a number or a numeric string.
fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts `"4.8"` or `4.8`; always yields the string form.
fn rating<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> ReviewsPayload {
        serde_json::from_value::<ReviewsEnvelope>(value)
            .unwrap()
            .into()
    }

    #[test]
    fn nested_aggregates() {
        let payload = parse(json!({
            "reviews": [],
            "places_reviews": {"totalReviewCount": 120, "averageRating": "4.9"}
        }));
        assert_eq!(payload.total_review_count, Some(120));
        assert_eq!(payload.average_rating.as_deref(), Some("4.9"));
    }

    #[test]
    fn top_level_aggregates_with_numeric_rating() {
        let payload = parse(json!({
            "reviews": [],
            "totalReviewCount": "87",
            "averageRating": 4.7
        }));
        assert_eq!(payload.total_review_count, Some(87));
        assert_eq!(payload.average_rating.as_deref(), Some("4.7"));
    }

    #[test]
    fn nested_shape_wins_when_both_present() {
        let payload = parse(json!({
            "places_reviews": {"totalReviewCount": 10},
            "totalReviewCount": 99,
            "averageRating": "4.5"
        }));
        assert_eq!(payload.total_review_count, Some(10));
        assert_eq!(payload.average_rating.as_deref(), Some("4.5"));
        assert!(payload.reviews.is_empty());
    }
}
