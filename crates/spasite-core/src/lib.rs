//! Domain model and pure business rules for the spa website backend.
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! configuration loading: review classification, display sampling,
//! promotion pricing, holiday notices and gift-card windows all take their
//! state as arguments and return fresh values.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod giftcards;
pub mod hours;
pub mod promotions;
pub mod reviews;
pub mod sampler;
pub mod text;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, StoreBackend};
pub use catalog::{
    load_catalog, CatalogFile, EnrichedPrice, EnrichedService, PriceEntry, Promotion,
    PromotionSummary, Service,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{classify, classify_all};
pub use giftcards::{active_gift_card_ids, GiftCard};
pub use hours::{resolve_holiday_notice, BusinessHoursRecord, HolidayNotice, SpecialHours};
pub use promotions::{
    apply_promotion_edit, resolve_active_promotions, resolve_service_pricing,
    resolve_single_promotion_details,
};
pub use reviews::{
    Blocklists, ClassifiedReview, FilterReason, PublicReview, PublicReviewsRecord, RawReview,
    ReviewAuditRecord,
};
pub use sampler::{select_display_subset, select_display_subset_with_rng, SamplePolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}

/// Rejection raised when admin-supplied catalog or promotion data breaks an
/// invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),
}
