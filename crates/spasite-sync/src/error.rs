use spasite_db::DbError;
use spasite_places::PlacesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The source was unreachable or answered with a non-2xx status.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[source] PlacesError),

    /// The source answered but the body was not the expected JSON.
    #[error("upstream payload could not be parsed: {0}")]
    UpstreamParse(#[source] PlacesError),

    #[error("store error: {0}")]
    Store(#[from] DbError),
}

impl From<PlacesError> for SyncError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::Deserialize { .. } => SyncError::UpstreamParse(err),
            PlacesError::Http(_)
            | PlacesError::UnexpectedStatus { .. }
            | PlacesError::InvalidBaseUrl { .. } => SyncError::UpstreamFetch(err),
        }
    }
}
