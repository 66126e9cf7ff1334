use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use super::{
    entities::{NewTracker, TrackerEntity, TrackerUpdate},
    window::TimeRange,
};

/// What can go wrong when talking to the service. A stale write gets its own
/// variant so callers can tell "someone else changed this record" apart from
/// a plain failure and react by refreshing instead of giving up.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed, nothing was applied anywhere.
    #[error("request to the tracker service failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The echoed version no longer matches the stored one.
    #[error("tracker {id} was changed by someone else, list again and retry")]
    VersionConflict { id: u64 },
    #[error("tracker {0} does not exist")]
    NotFound(u64),
    /// Client side refusal. Stopping is a one way transition, the service
    /// enforces it too.
    #[error("tracker {0} is already stopped")]
    AlreadyStopped(u64),
    /// The service rejected the request. The message is passed along
    /// verbatim, validation rules belong to the service.
    #[error("tracker service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Contract to the tracker service. The service is the sole owner of
/// persisted tracker state, the client only reads snapshots and submits
/// intents.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Lists trackers whose start time falls inside `range`, or every tracker
    /// when no range is given.
    async fn list(&self, range: Option<TimeRange<Utc>>) -> Result<Vec<TrackerEntity>, ApiError>;

    async fn get(&self, id: u64) -> Result<TrackerEntity, ApiError>;

    async fn create(&self, draft: NewTracker) -> Result<TrackerEntity, ApiError>;

    /// Applies an update guarded by the echoed version. A stale version must
    /// surface as [ApiError::VersionConflict], never as a silent overwrite.
    async fn update(&self, id: u64, update: TrackerUpdate) -> Result<TrackerEntity, ApiError>;

    /// Removes a tracker. No version is echoed here: delete is destructive
    /// and idempotent, so it wins over concurrent edits.
    async fn delete(&self, id: u64) -> Result<(), ApiError>;
}
