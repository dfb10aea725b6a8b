//! Typed access to the documents the site reads and writes.
//!
//! | collection   | id           | body                      |
//! |--------------|--------------|---------------------------|
//! | `reviews`    | `audit`      | [`ReviewAuditRecord`]     |
//! | `reviews`    | `public`     | [`PublicReviewsRecord`]   |
//! | `blocklists` | `timestamps` | `{"timestamps": [..]}`    |
//! | `blocklists` | `words`      | `{"words": [..]}`         |
//! | `hours`      | `current`    | [`BusinessHoursRecord`]   |
//! | `holidays`   | `labels`     | `{"YYYY-MM-DD": "label"}` |
//! | `services`   | service id   | [`Service`]               |
//! | `promotions` | promotion id | [`Promotion`]             |
//! | `giftcards`  | card id      | [`GiftCard`]              |

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use spasite_core::{
    BusinessHoursRecord, GiftCard, Promotion, PublicReviewsRecord, ReviewAuditRecord, Service,
};

use crate::store::{Document, DocumentStore};
use crate::DbError;

pub const REVIEWS: &str = "reviews";
pub const REVIEWS_AUDIT: &str = "audit";
pub const REVIEWS_PUBLIC: &str = "public";
pub const BLOCKLISTS: &str = "blocklists";
pub const BLOCKLIST_TIMESTAMPS: &str = "timestamps";
pub const BLOCKLIST_WORDS: &str = "words";
pub const HOURS: &str = "hours";
pub const HOURS_CURRENT: &str = "current";
pub const HOLIDAYS: &str = "holidays";
pub const HOLIDAY_LABELS: &str = "labels";
pub const SERVICES: &str = "services";
pub const PROMOTIONS: &str = "promotions";
pub const GIFT_CARDS: &str = "giftcards";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TimestampBlocklist {
    #[serde(default)]
    timestamps: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WordBlocklist {
    #[serde(default)]
    words: Vec<String>,
}

fn decode<T: DeserializeOwned>(collection: &str, id: &str, body: Value) -> Result<T, DbError> {
    serde_json::from_value(body).map_err(|source| DbError::Decode {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}

fn encode<T: Serialize>(collection: &str, id: &str, value: &T) -> Result<Value, DbError> {
    serde_json::to_value(value).map_err(|source| DbError::Encode {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}

async fn load<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, DbError> {
    match store.get(collection, id).await? {
        Some(body) => decode(collection, id, body).map(Some),
        None => Ok(None),
    }
}

async fn save<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<(), DbError> {
    let body = encode(collection, id, value)?;
    store.put(collection, id, body).await
}

async fn list_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<T>, DbError> {
    store
        .list(collection)
        .await?
        .into_iter()
        .map(|(id, body)| decode(collection, &id, body))
        .collect()
}

/// # Errors
///
/// Returns [`DbError`] if the read fails or the stored document is malformed.
pub async fn load_review_audit(
    store: &dyn DocumentStore,
) -> Result<Option<ReviewAuditRecord>, DbError> {
    load(store, REVIEWS, REVIEWS_AUDIT).await
}

/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub async fn save_review_audit(
    store: &dyn DocumentStore,
    record: &ReviewAuditRecord,
) -> Result<(), DbError> {
    save(store, REVIEWS, REVIEWS_AUDIT, record).await
}

/// # Errors
///
/// Returns [`DbError`] if the read fails or the stored document is malformed.
pub async fn load_public_reviews(
    store: &dyn DocumentStore,
) -> Result<Option<PublicReviewsRecord>, DbError> {
    load(store, REVIEWS, REVIEWS_PUBLIC).await
}

/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub async fn save_public_reviews(
    store: &dyn DocumentStore,
    record: &PublicReviewsRecord,
) -> Result<(), DbError> {
    save(store, REVIEWS, REVIEWS_PUBLIC, record).await
}

/// Admin-hidden review timestamps. A missing document is an empty list.
///
/// # Errors
///
/// Returns [`DbError`] if the read fails or the stored document is malformed.
pub async fn load_timestamp_blocklist(store: &dyn DocumentStore) -> Result<Vec<String>, DbError> {
    let doc: Option<TimestampBlocklist> = load(store, BLOCKLISTS, BLOCKLIST_TIMESTAMPS).await?;
    Ok(doc.unwrap_or_default().timestamps)
}

/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub async fn save_timestamp_blocklist(
    store: &dyn DocumentStore,
    timestamps: Vec<String>,
) -> Result<(), DbError> {
    save(
        store,
        BLOCKLISTS,
        BLOCKLIST_TIMESTAMPS,
        &TimestampBlocklist { timestamps },
    )
    .await
}

/// Blocklisted words. A missing document is an empty list.
///
/// # Errors
///
/// Returns [`DbError`] if the read fails or the stored document is malformed.
pub async fn load_word_blocklist(store: &dyn DocumentStore) -> Result<Vec<String>, DbError> {
    let doc: Option<WordBlocklist> = load(store, BLOCKLISTS, BLOCKLIST_WORDS).await?;
    Ok(doc.unwrap_or_default().words)
}

/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub async fn save_word_blocklist(
    store: &dyn DocumentStore,
    words: Vec<String>,
) -> Result<(), DbError> {
    save(store, BLOCKLISTS, BLOCKLIST_WORDS, &WordBlocklist { words }).await
}

/// # Errors
///
/// Returns [`DbError`] if the read fails or the stored document is malformed.
pub async fn load_business_hours(
    store: &dyn DocumentStore,
) -> Result<Option<BusinessHoursRecord>, DbError> {
    load(store, HOURS, HOURS_CURRENT).await
}

/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub async fn save_business_hours(
    store: &dyn DocumentStore,
    record: &BusinessHoursRecord,
) -> Result<(), DbError> {
    save(store, HOURS, HOURS_CURRENT, record).await
}

/// Date (`YYYY-MM-DD`) to holiday name. A missing document is an empty map.
///
/// # Errors
///
/// Returns [`DbError`] if the read fails or the stored document is malformed.
pub async fn load_holiday_labels(
    store: &dyn DocumentStore,
) -> Result<BTreeMap<String, String>, DbError> {
    let labels: Option<BTreeMap<String, String>> = load(store, HOLIDAYS, HOLIDAY_LABELS).await?;
    Ok(labels.unwrap_or_default())
}

/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub async fn save_holiday_labels(
    store: &dyn DocumentStore,
    labels: &BTreeMap<String, String>,
) -> Result<(), DbError> {
    save(store, HOLIDAYS, HOLIDAY_LABELS, labels).await
}

/// # Errors
///
/// Returns [`DbError`] if the read fails or a stored service is malformed.
pub async fn list_services(store: &dyn DocumentStore) -> Result<Vec<Service>, DbError> {
    list_all(store, SERVICES).await
}

/// # Errors
///
/// Returns [`DbError`] if the read fails or the stored service is malformed.
pub async fn load_service(store: &dyn DocumentStore, id: &str) -> Result<Option<Service>, DbError> {
    load(store, SERVICES, id).await
}

/// # Errors
///
/// Returns [`DbError`] if the write fails.
pub async fn save_service(store: &dyn DocumentStore, service: &Service) -> Result<(), DbError> {
    save(store, SERVICES, &service.id, service).await
}

/// All promotions, ordered by id.
///
/// # Errors
///
/// Returns [`DbError`] if the read fails or a stored promotion is malformed.
pub async fn list_promotions(store: &dyn DocumentStore) -> Result<Vec<Promotion>, DbError> {
    list_all(store, PROMOTIONS).await
}

/// Writes every promotion in one atomic batch.
///
/// # Errors
///
/// Returns [`DbError`] if encoding fails or the batch is rejected; in that
/// case nothing is written.
pub async fn save_promotions(
    store: &dyn DocumentStore,
    promotions: &[Promotion],
) -> Result<(), DbError> {
    let documents = promotions
        .iter()
        .map(|p| encode(PROMOTIONS, &p.id, p).map(|body| Document::new(PROMOTIONS, &p.id, body)))
        .collect::<Result<Vec<_>, _>>()?;
    store.put_many(documents).await
}

/// # Errors
///
/// Returns [`DbError`] if the read fails or a stored card is malformed.
pub async fn list_gift_cards(store: &dyn DocumentStore) -> Result<Vec<GiftCard>, DbError> {
    list_all(store, GIFT_CARDS).await
}

pub(crate) fn service_document(service: &Service) -> Result<Document, DbError> {
    encode(SERVICES, &service.id, service).map(|body| Document::new(SERVICES, &service.id, body))
}

pub(crate) fn promotion_document(promotion: &Promotion) -> Result<Document, DbError> {
    encode(PROMOTIONS, &promotion.id, promotion)
        .map(|body| Document::new(PROMOTIONS, &promotion.id, body))
}

pub(crate) fn gift_card_document(card: &GiftCard) -> Result<Document, DbError> {
    encode(GIFT_CARDS, &card.id, card).map(|body| Document::new(GIFT_CARDS, &card.id, body))
}

pub(crate) fn holiday_labels_document(
    labels: &BTreeMap<String, String>,
) -> Result<Document, DbError> {
    encode(HOLIDAYS, HOLIDAY_LABELS, labels)
        .map(|body| Document::new(HOLIDAYS, HOLIDAY_LABELS, body))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;

    use spasite_core::PriceEntry;

    use super::*;
    use crate::MemoryDocumentStore;

    fn promotion(id: &str, enabled: bool) -> Promotion {
        Promotion {
            id: id.into(),
            label: id.to_uppercase(),
            enabled,
            start_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap(),
            discounts: spasite_core::catalog::DiscountMap::new(),
        }
    }

    #[tokio::test]
    async fn missing_blocklists_read_as_empty() {
        let store = MemoryDocumentStore::new();
        assert!(load_word_blocklist(&store).await.unwrap().is_empty());
        assert!(load_timestamp_blocklist(&store).await.unwrap().is_empty());
        assert!(load_holiday_labels(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blocklists_are_stored_under_their_own_keys() {
        let store = MemoryDocumentStore::new();
        save_word_blocklist(&store, vec!["atom".into()]).await.unwrap();
        save_timestamp_blocklist(&store, vec!["2024-01-01T00:00:00Z".into()])
            .await
            .unwrap();

        assert_eq!(
            store.get(BLOCKLISTS, BLOCKLIST_WORDS).await.unwrap(),
            Some(json!({"words": ["atom"]}))
        );
        assert_eq!(
            load_timestamp_blocklist(&store).await.unwrap(),
            vec!["2024-01-01T00:00:00Z".to_string()]
        );
    }

    #[tokio::test]
    async fn malformed_document_reports_its_key() {
        let store = MemoryDocumentStore::new();
        store
            .put(SERVICES, "swedish", json!({"id": 5}))
            .await
            .unwrap();

        let err = list_services(&store).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Decode { ref collection, ref id, .. } if collection == "services" && id == "swedish"
        ));
    }

    #[tokio::test]
    async fn services_round_trip_with_decimal_prices() {
        let store = MemoryDocumentStore::new();
        let service = Service {
            id: "swedish".into(),
            name: "Swedish".into(),
            description: None,
            prices: vec![PriceEntry {
                id: "0".into(),
                duration: 60,
                price: Decimal::new(8950, 2),
            }],
        };
        save_service(&store, &service).await.unwrap();

        let loaded = load_service(&store, "swedish").await.unwrap().unwrap();
        assert_eq!(loaded, service);
    }

    #[tokio::test]
    async fn promotions_list_in_id_order() {
        let store = MemoryDocumentStore::new();
        save_promotions(&store, &[promotion("winter", true), promotion("autumn", false)])
            .await
            .unwrap();

        let ids: Vec<String> = list_promotions(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["autumn".to_string(), "winter".to_string()]);
    }
}
