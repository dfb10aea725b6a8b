//! Service catalog, promotions and the YAML seed file.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::giftcards::GiftCard;
use crate::{ConfigError, CoreError};

/// One bookable duration of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Stable within the owning service, e.g. `"0"`, `"1"`.
    pub id: String,
    /// Minutes.
    pub duration: u32,
    /// Base price in whole currency units.
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub prices: Vec<PriceEntry>,
}

/// Sparse discount table: service id, then price id, to an amount taken
/// off the base price.
pub type DiscountMap = BTreeMap<String, BTreeMap<String, Decimal>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(deserialize_with = "deserialize_instant")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_instant")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub discounts: DiscountMap,
}

impl Promotion {
    /// Enabled and `start_date <= at <= end_date`, both ends inclusive.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.enabled && self.start_date <= at && at <= self.end_date
    }

    /// Checks the invariants an admin edit must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] describing the first violation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation("promotion id must be non-empty".into()));
        }
        if self.label.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "promotion '{}' must have a label",
                self.id
            )));
        }
        if self.start_date > self.end_date {
            return Err(CoreError::Validation(format!(
                "promotion '{}' ends before it starts",
                self.id
            )));
        }
        for (service_id, amounts) in &self.discounts {
            for (price_id, amount) in amounts {
                if *amount < Decimal::ZERO {
                    return Err(CoreError::Validation(format!(
                        "promotion '{}' has a negative discount for {service_id}/{price_id}",
                        self.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A price entry as served to the site, with the discounted price when a
/// promotion applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPrice {
    pub id: String,
    pub duration: u32,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_price: Option<Decimal>,
}

impl From<&PriceEntry> for EnrichedPrice {
    fn from(entry: &PriceEntry) -> Self {
        Self {
            id: entry.id.clone(),
            duration: entry.duration,
            price: entry.price,
            promo_price: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedService {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub prices: Vec<EnrichedPrice>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_promo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_label: Option<String>,
}

impl From<&Service> for EnrichedService {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            prices: service.prices.iter().map(EnrichedPrice::from).collect(),
            has_promo: false,
            promo_label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionSummary {
    pub id: String,
    pub label: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<&Promotion> for PromotionSummary {
    fn from(promotion: &Promotion) -> Self {
        Self {
            id: promotion.id.clone(),
            label: promotion.label.clone(),
            start_date: promotion.start_date,
            end_date: promotion.end_date,
        }
    }
}

/// Checks a service's price list before it is persisted.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] for empty or duplicate price ids, a
/// zero duration, or a negative price.
pub fn validate_prices(prices: &[PriceEntry]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for entry in prices {
        if entry.id.trim().is_empty() {
            return Err(CoreError::Validation("price id must be non-empty".into()));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate price id '{}'",
                entry.id
            )));
        }
        if entry.duration == 0 {
            return Err(CoreError::Validation(format!(
                "price '{}' must have a positive duration",
                entry.id
            )));
        }
        if entry.price < Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "price '{}' must not be negative",
                entry.id
            )));
        }
    }
    Ok(())
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (UTC) or a bare date
/// (UTC midnight).
#[must_use]
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date or instant '{raw}'")))
}

/// Seed data for a fresh store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogFile {
    pub services: Vec<Service>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub gift_cards: Vec<GiftCard>,
    #[serde(default)]
    pub holiday_labels: BTreeMap<String, String>,
}

/// Load and validate the catalog seed file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse and validate catalog YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let to_config = |e: CoreError| match e {
        CoreError::Validation(msg) => ConfigError::Validation(msg),
    };

    let mut service_ids = HashSet::new();
    for service in &catalog.services {
        if service.id.trim().is_empty() {
            return Err(ConfigError::Validation("service id must be non-empty".into()));
        }
        if !service_ids.insert(service.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate service id: '{}'",
                service.id
            )));
        }
        validate_prices(&service.prices).map_err(|CoreError::Validation(msg)| {
            ConfigError::Validation(format!("service '{}': {msg}", service.id))
        })?;
    }

    let mut promotion_ids = HashSet::new();
    for promotion in &catalog.promotions {
        promotion.validate().map_err(to_config)?;
        if !promotion_ids.insert(promotion.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate promotion id: '{}'",
                promotion.id
            )));
        }
    }
    if catalog.promotions.iter().filter(|p| p.enabled).count() > 1 {
        return Err(ConfigError::Validation(
            "at most one promotion may be enabled".into(),
        ));
    }

    let mut gift_card_ids = HashSet::new();
    for card in &catalog.gift_cards {
        card.validate().map_err(to_config)?;
        if !gift_card_ids.insert(card.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate gift card id: '{}'",
                card.id
            )));
        }
    }

    Ok(())
}
