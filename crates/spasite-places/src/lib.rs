//! Client for the external source that publishes the business's reviews and
//! opening hours.

pub mod client;
pub mod error;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use types::ReviewsPayload;
