//! Review records as they move from the upstream source to the public site.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A review as delivered by the external review source.
///
/// Deserialization never rejects a field value: `null` or a non-string
/// becomes `""`, and a rating that is not a number in `0..=255` becomes
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    #[serde(default, deserialize_with = "lenient_string")]
    pub author_name: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<u8>,
    /// ISO-8601 timestamp of the review despite the upstream field name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub relative_time_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Integer(u64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseValue::deserialize(deserializer)? {
        LooseValue::Text(s) => s,
        _ => String::new(),
    })
}

/// Whole stars: `4.5` counts as 4 so it still passes the rating check,
/// `3.9` counts as 3 so it does not.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let stars = match LooseValue::deserialize(deserializer)? {
        LooseValue::Integer(n) => return Ok(u8::try_from(n).ok()),
        LooseValue::Float(f) => f,
        LooseValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(f) => f,
            Err(_) => return Ok(None),
        },
        LooseValue::Other(_) => return Ok(None),
    };
    if stars.is_finite() && (0.0..256.0).contains(&stars) {
        Ok(Some(stars.floor() as u8))
    } else {
        Ok(None)
    }
}

/// Why a review was kept off the public site. Variants are listed in the
/// order the filter evaluates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FilterReason {
    EmptyText,
    LowRating,
    TooLong,
    Translated,
    UnicodeText,
    BlocklistedWord(String),
    BlocklistedTimestamp,
    SpecialCharsName,
    TooManyNameParts,
    InvalidNameFormat,
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterReason::EmptyText => write!(f, "empty text"),
            FilterReason::LowRating => write!(f, "rating below 4"),
            FilterReason::TooLong => write!(f, "text longer than 250 characters"),
            FilterReason::Translated => write!(f, "machine translated"),
            FilterReason::UnicodeText => write!(f, "non-ASCII text"),
            FilterReason::BlocklistedWord(word) => write!(f, "blocklisted word: {word}"),
            FilterReason::BlocklistedTimestamp => write!(f, "blocklisted by admin"),
            FilterReason::SpecialCharsName => write!(f, "special characters in name"),
            FilterReason::TooManyNameParts => write!(f, "name has more than two parts"),
            FilterReason::InvalidNameFormat => write!(f, "name could not be formatted"),
        }
    }
}

/// A review after one pass through the filter. `filter_reason == None`
/// means the review is approved for public display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReview {
    pub author_name: String,
    pub rating: Option<u8>,
    pub relative_time_description: String,
    /// Punctuation-normalized text with line breaks collapsed.
    pub text: String,
    pub author_name_formatted: String,
    pub date_label: String,
    pub filter_reason: Option<FilterReason>,
}

impl ClassifiedReview {
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.filter_reason.is_none()
    }

    /// Projects an approved review onto its public fields.
    #[must_use]
    pub fn to_public(&self) -> PublicReview {
        PublicReview {
            author_name_formatted: self.author_name_formatted.clone(),
            rating: self.rating,
            relative_time_description: self.relative_time_description.clone(),
            text: self.text.clone(),
            date_label: self.date_label.clone(),
        }
    }
}

/// The fields of an approved review that are safe to publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicReview {
    pub author_name_formatted: String,
    pub rating: Option<u8>,
    pub relative_time_description: String,
    pub text: String,
    pub date_label: String,
}

/// Approved subset of a classified set, in input order.
#[must_use]
pub fn public_subset(classified: &[ClassifiedReview]) -> Vec<PublicReview> {
    classified
        .iter()
        .filter(|r| r.is_approved())
        .map(ClassifiedReview::to_public)
        .collect()
}

/// Full classified set kept for the admin audit view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuditRecord {
    pub reviews: Vec<ClassifiedReview>,
    pub total_review_count: Option<u64>,
    pub average_rating: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}

/// Approved reviews served to the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReviewsRecord {
    pub reviews: Vec<PublicReview>,
    pub total_review_count: Option<u64>,
    pub average_rating: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// The two admin-maintained blocklists, read fresh on every sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklists {
    /// Exact review timestamps hidden by an admin.
    pub timestamps: HashSet<String>,
    /// Lower-cased words; order is kept so the first match is reported
    /// deterministically.
    pub words: Vec<String>,
}

impl Blocklists {
    #[must_use]
    pub fn new(timestamps: impl IntoIterator<Item = String>, words: Vec<String>) -> Self {
        Self {
            timestamps: timestamps.into_iter().collect(),
            words: normalize_blocklist_words(words),
        }
    }
}

/// Trims, lower-cases and de-duplicates blocklist words, dropping empties
/// and keeping first-seen order.
#[must_use]
pub fn normalize_blocklist_words(words: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

/// Trims and de-duplicates blocklisted timestamps, keeping first-seen order.
#[must_use]
pub fn normalize_blocklist_timestamps(timestamps: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(timestamps.len());
    for ts in timestamps {
        let ts = ts.trim().to_string();
        if !ts.is_empty() && !out.contains(&ts) {
            out.push(ts);
        }
    }
    out
}

/// Reviews shown when the stored public set cannot be read.
#[must_use]
pub fn default_public_reviews() -> PublicReviewsRecord {
    let review = |name: &str, ts: &str, label: &str, text: &str| PublicReview {
        author_name_formatted: name.to_string(),
        rating: Some(5),
        relative_time_description: ts.to_string(),
        text: text.to_string(),
        date_label: label.to_string(),
    };

    PublicReviewsRecord {
        reviews: vec![
            review(
                "Sarah M.",
                "2024-05-12T00:00:00Z",
                "May 2024",
                "Wonderful massage, I left feeling completely relaxed.",
            ),
            review(
                "David K.",
                "2024-04-03T00:00:00Z",
                "April 2024",
                "Friendly staff and a very clean, calm space. Highly recommend.",
            ),
            review(
                "Linda",
                "2024-02-20T00:00:00Z",
                "February 2024",
                "Best deep tissue massage I have had in years.",
            ),
        ],
        total_review_count: None,
        average_rating: None,
        last_synced_at: None,
    }
}
