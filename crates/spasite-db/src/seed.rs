use std::collections::BTreeMap;

use spasite_core::{apply_promotion_edit, CatalogFile, Promotion};

use crate::records::{
    gift_card_document, holiday_labels_document, list_promotions, promotion_document,
    service_document,
};
use crate::store::DocumentStore;
use crate::DbError;

/// Counts of documents written by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub services: usize,
    pub promotions: usize,
    pub gift_cards: usize,
    pub holiday_labels: usize,
}

/// Writes the catalog seed file into the store.
///
/// Every document is written in one batch; if any write fails the store is
/// left untouched. Existing documents with the same keys are replaced.
/// Holiday labels are only written when the file defines some, so a seed
/// without labels never clears labels an admin has set.
///
/// Seeded promotions go through the same edit rule as the admin API: an
/// enabled promotion disables every other stored promotion, and when the
/// file enables several the last one stays enabled.
///
/// # Errors
///
/// Returns [`DbError`] if encoding fails or the batch is rejected.
pub async fn seed_catalog(
    store: &dyn DocumentStore,
    catalog: &CatalogFile,
) -> Result<SeedSummary, DbError> {
    let mut documents = Vec::new();
    for service in &catalog.services {
        documents.push(service_document(service)?);
    }
    for promotion in merge_promotions(list_promotions(store).await?, &catalog.promotions) {
        documents.push(promotion_document(&promotion)?);
    }
    for card in &catalog.gift_cards {
        documents.push(gift_card_document(card)?);
    }
    if !catalog.holiday_labels.is_empty() {
        documents.push(holiday_labels_document(&catalog.holiday_labels)?);
    }

    store.put_many(documents).await?;

    let summary = SeedSummary {
        services: catalog.services.len(),
        promotions: catalog.promotions.len(),
        gift_cards: catalog.gift_cards.len(),
        holiday_labels: catalog.holiday_labels.len(),
    };
    tracing::info!(
        services = summary.services,
        promotions = summary.promotions,
        gift_cards = summary.gift_cards,
        holiday_labels = summary.holiday_labels,
        "catalog seeded"
    );
    Ok(summary)
}

/// Promotions that must be written so `seeded` lands on top of `stored`.
fn merge_promotions(stored: Vec<Promotion>, seeded: &[Promotion]) -> Vec<Promotion> {
    let mut current: BTreeMap<String, Promotion> =
        stored.into_iter().map(|p| (p.id.clone(), p)).collect();
    let mut writes = BTreeMap::new();
    for promotion in seeded {
        let existing: Vec<Promotion> = current.values().cloned().collect();
        for write in apply_promotion_edit(&existing, promotion.clone()) {
            current.insert(write.id.clone(), write.clone());
            writes.insert(write.id.clone(), write);
        }
    }
    writes.into_values().collect()
}
