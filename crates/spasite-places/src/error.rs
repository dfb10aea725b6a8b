use thiserror::Error;

/// Errors returned by the review/hours source client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-2xx status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body was not the JSON shape we expect.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
