use chrono::Local;
use tracing::debug;

use crate::utils::clock::Clock;

use super::{
    api::{ApiError, TrackerApi},
    entities::{NewTracker, TrackerEntity},
    window::TimeWindow,
};

/// Client side view of the tracker collection.
///
/// The service stays the single source of truth. Every mutation is submitted
/// and then the whole snapshot is refetched under the active window, nothing
/// is ever patched in place. That costs one extra round trip per action and
/// buys a strong guarantee: the displayed state is never more than one round
/// trip stale and can't drift through a local merge bug. A failed action
/// leaves the previous snapshot untouched.
pub struct TrackerSession<A: TrackerApi> {
    api: A,
    clock: Box<dyn Clock>,
    window: TimeWindow,
    trackers: Vec<TrackerEntity>,
}

impl<A: TrackerApi> TrackerSession<A> {
    pub fn new(api: A, clock: Box<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            window: TimeWindow::default(),
            trackers: Vec::new(),
        }
    }

    /// The snapshot as of the last successful refresh.
    pub fn trackers(&self) -> &[TrackerEntity] {
        &self.trackers
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn find(&self, id: u64) -> Option<&TrackerEntity> {
        self.trackers.iter().find(|tracker| tracker.id == id)
    }

    /// Switches the active window and refreshes under it.
    pub async fn select(&mut self, window: TimeWindow) -> Result<&[TrackerEntity], ApiError> {
        self.window = window;
        self.refresh().await
    }

    /// Replaces the snapshot with whatever the service holds for the active
    /// window right now. The window boundaries are taken from the local
    /// calendar at call time.
    pub async fn refresh(&mut self) -> Result<&[TrackerEntity], ApiError> {
        let now = self.clock.time().with_timezone(&Local);
        let range = self.window.interval(now).map(|range| range.to_utc());

        debug!("Refreshing {} window", self.window);
        let trackers = self.api.list(range).await?;
        self.trackers = trackers;
        Ok(&self.trackers)
    }

    /// Starts a new tracker running from now.
    pub async fn create(&mut self, name: impl Into<String>) -> Result<TrackerEntity, ApiError> {
        let draft = NewTracker {
            start: self.clock.time(),
            name: name.into(),
        };
        let created = self.api.create(draft).await?;
        self.refresh().await?;
        Ok(created)
    }

    /// Stops a running tracker. Refuses locally once `end` is set, and the
    /// service rejects a stale version on its side, so a tracker can only be
    /// stopped once.
    pub async fn stop(&mut self, id: u64) -> Result<TrackerEntity, ApiError> {
        let Some(tracker) = self.find(id) else {
            return Err(ApiError::NotFound(id));
        };
        if !tracker.is_running() {
            return Err(ApiError::AlreadyStopped(id));
        }

        let update = tracker.stop_request(self.clock.time());
        let stopped = self.api.update(id, update).await?;
        self.refresh().await?;
        Ok(stopped)
    }

    /// Renames a tracker, running or stopped.
    pub async fn rename(
        &mut self,
        id: u64,
        new_name: impl Into<String>,
    ) -> Result<TrackerEntity, ApiError> {
        let Some(tracker) = self.find(id) else {
            return Err(ApiError::NotFound(id));
        };

        let update = tracker.rename_request(new_name);
        let renamed = self.api.update(id, update).await?;
        self.refresh().await?;
        Ok(renamed)
    }

    /// Removes a tracker. Deletion carries no version, it wins over any
    /// concurrent edit.
    pub async fn delete(&mut self, id: u64) -> Result<(), ApiError> {
        self.api.delete(id).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Fetches a single tracker straight from the service. Read only, the
    /// snapshot is left as is.
    pub async fn show(&self, id: u64) -> Result<TrackerEntity, ApiError> {
        self.api.get(id).await
    }
}
