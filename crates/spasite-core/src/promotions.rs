//! Promotion resolution: overlays active discounts onto the price catalog.
//!
//! All functions take promotions in a caller-defined order and treat that
//! order as the tie-break when more than one active promotion covers the
//! same service. The store lists promotions by id, so in practice the
//! lowest id wins.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::catalog::{EnrichedService, Promotion, PromotionSummary, Service};

/// Promotions active at `now`, in input order.
pub fn active_promotions(
    promotions: &[Promotion],
    now: DateTime<Utc>,
) -> impl Iterator<Item = &Promotion> {
    promotions.iter().filter(move |p| p.is_active_at(now))
}

/// Computes the price list shown to customers at `now`.
///
/// For each service the first active promotion whose discount map names
/// the service is applied: every price with a positive discount gets
/// `promo_price = max(0, price - discount)`. A service is only flagged
/// `has_promo` when at least one of its prices was actually discounted;
/// otherwise it is returned untouched, even if the promotion listed it with
/// zero discounts.
#[must_use]
pub fn resolve_service_pricing(
    services: &[Service],
    promotions: &[Promotion],
    now: DateTime<Utc>,
) -> Vec<EnrichedService> {
    let active: Vec<&Promotion> = active_promotions(promotions, now).collect();
    services
        .iter()
        .map(|service| enrich_service(service, &active))
        .collect()
}

fn enrich_service(service: &Service, active: &[&Promotion]) -> EnrichedService {
    let mut enriched = EnrichedService::from(service);

    let Some((promotion, discounts)) = active
        .iter()
        .find_map(|p| p.discounts.get(&service.id).map(|d| (*p, d)))
    else {
        return enriched;
    };

    let mut any_discounted = false;
    for price in &mut enriched.prices {
        let Some(discount) = discounts.get(&price.id).filter(|d| **d > Decimal::ZERO) else {
            continue;
        };
        price.promo_price = Some((price.price - *discount).max(Decimal::ZERO));
        any_discounted = true;
    }

    if any_discounted {
        enriched.has_promo = true;
        enriched.promo_label = Some(promotion.label.clone());
        enriched
    } else {
        EnrichedService::from(service)
    }
}

/// Id, label and window of every promotion active at `now`, keyed by id.
#[must_use]
pub fn resolve_active_promotions(
    promotions: &[Promotion],
    now: DateTime<Utc>,
) -> BTreeMap<String, PromotionSummary> {
    active_promotions(promotions, now)
        .map(|p| (p.id.clone(), PromotionSummary::from(p)))
        .collect()
}

/// Full record of the first promotion active at `now`, if any.
#[must_use]
pub fn resolve_single_promotion_details(
    promotions: &[Promotion],
    now: DateTime<Utc>,
) -> Option<Promotion> {
    active_promotions(promotions, now).next().cloned()
}

/// Documents to write when an admin saves `edited`.
///
/// Returns the edited promotion first, followed by every other promotion
/// that must be switched off because `edited` is enabled. Writing the
/// returned set in one batch keeps at most one promotion enabled.
#[must_use]
pub fn apply_promotion_edit(existing: &[Promotion], edited: Promotion) -> Vec<Promotion> {
    let mut writes = Vec::new();
    if edited.enabled {
        writes.extend(
            existing
                .iter()
                .filter(|p| p.id != edited.id && p.enabled)
                .map(|p| Promotion {
                    enabled: false,
                    ..p.clone()
                }),
        );
    }
    writes.insert(0, edited);
    writes
}
