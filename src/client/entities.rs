use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A single activity record as the service returns it. The service owns every
/// field: the client never invents an `id` or bumps a `version`, it only reads
/// records and echoes values back.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct TrackerEntity {
    pub id: u64,
    pub name: String,
    pub start: DateTime<Utc>,
    /// Missing end means the tracker is still running. Once the service sets
    /// it the tracker is stopped for good, there is no resume.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Concurrency token. Sent back on updates to assert "nobody changed this
    /// since I read it".
    pub version: u32,
}

impl TrackerEntity {
    /// Running is derived from `end`, it is not a stored flag.
    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    /// Time spent on the tracker. Fixed for a stopped tracker, grows with
    /// `now` for a running one, so callers recompute it per render.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        self.end.unwrap_or(now) - self.start
    }

    /// Builds the update that marks this tracker finished. Keeps the current
    /// name and echoes the version observed when the record was read.
    pub fn stop_request(&self, end: DateTime<Utc>) -> TrackerUpdate {
        TrackerUpdate {
            name: self.name.clone(),
            end: Some(end),
            version: self.version,
        }
    }

    /// Builds the update that changes the name. The stop state is carried over
    /// untouched, so renaming works the same for running and stopped trackers.
    pub fn rename_request(&self, name: impl Into<String>) -> TrackerUpdate {
        TrackerUpdate {
            name: name.into(),
            end: self.end,
            version: self.version,
        }
    }
}

/// Body of a create request. The service fills in `id`, the initial `version`
/// and leaves `end` absent, so a fresh tracker is always running.
#[derive(PartialEq, Eq, Debug, Serialize, Clone)]
pub struct NewTracker {
    pub start: DateTime<Utc>,
    pub name: String,
}

/// Body of an update request: the intent plus the last seen version. Built
/// through [TrackerEntity::stop_request] and [TrackerEntity::rename_request]
/// so the version always comes from an actual read.
#[derive(PartialEq, Eq, Debug, Serialize, Clone)]
pub struct TrackerUpdate {
    pub name: String,
    pub end: Option<DateTime<Utc>>,
    pub version: u32,
}
