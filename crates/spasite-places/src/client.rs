//! HTTP client for the external review and business-hours source.
//!
//! Both endpoints are plain `GET`s returning JSON. Non-2xx answers surface as
//! [`PlacesError::UnexpectedStatus`]; bodies that do not match the expected
//! shape surface as [`PlacesError::Deserialize`]. Requests are not retried:
//! a failed sync is simply run again on the next trigger.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use spasite_core::BusinessHoursRecord;

use crate::error::PlacesError;
use crate::types::{ReviewsEnvelope, ReviewsPayload};

/// Client for the review/hours source.
///
/// Use [`PlacesClient::new`] with the configured endpoints; tests point both
/// endpoints at a wiremock server.
pub struct PlacesClient {
    client: Client,
    reviews_url: Url,
    hours_url: Url,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if either
    /// endpoint is not a valid absolute URL.
    pub fn new(reviews_url: &str, hours_url: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("spasite/0.1 (review-sync)")
            .build()?;

        Ok(Self {
            client,
            reviews_url: parse_url(reviews_url)?,
            hours_url: parse_url(hours_url)?,
        })
    }

    /// Builds a client whose endpoints are `{base}/reviews` and
    /// `{base}/hours`.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::new`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        let base = base_url.trim_end_matches('/');
        Self::new(
            &format!("{base}/reviews"),
            &format!("{base}/hours"),
            timeout_secs,
        )
    }

    /// Fetches every review currently published by the source.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or timeout.
    /// - [`PlacesError::UnexpectedStatus`] on a non-2xx answer.
    /// - [`PlacesError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch_reviews(&self) -> Result<ReviewsPayload, PlacesError> {
        let envelope: ReviewsEnvelope = self.get_json(&self.reviews_url).await?;
        let payload = ReviewsPayload::from(envelope);
        tracing::debug!(
            reviews = payload.reviews.len(),
            total_review_count = ?payload.total_review_count,
            "fetched reviews"
        );
        Ok(payload)
    }

    /// Fetches the current business-hours record.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::fetch_reviews`].
    pub async fn fetch_hours(&self) -> Result<BusinessHoursRecord, PlacesError> {
        let record: BusinessHoursRecord = self.get_json(&self.hours_url).await?;
        tracing::debug!(
            regular = record.regular_hours.len(),
            special = record.special_hours.len(),
            "fetched business hours"
        );
        Ok(record)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, PlacesError> {
    Url::parse(raw.trim()).map_err(|e| PlacesError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
