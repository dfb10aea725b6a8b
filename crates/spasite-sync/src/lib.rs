//! Sync orchestrators shared by the scheduler, the admin HTTP triggers and
//! the callable RPC transport.
//!
//! Every run is a full replace of the records it owns; there is no
//! incremental state to reconcile, so runs may overlap or repeat freely.

pub mod error;
pub mod hours;
pub mod reviews;

pub use error::SyncError;
pub use hours::{perform_hours_sync, HoursSyncSummary};
pub use reviews::{perform_review_sync, perform_review_sync_at, SyncSummary};
