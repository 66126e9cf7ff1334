use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    api::{ApiError, TrackerApi},
    entities::{NewTracker, TrackerEntity, TrackerUpdate},
    window::TimeRange,
};

/// Timestamp layout of the `start_date`/`end_date` query parameters. The
/// service parses exactly this millisecond form, RFC 3339 with more or fewer
/// digits gets rejected.
fn query_timestamp(moment: DateTime<Utc>) -> String {
    moment.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Maps a non-success status onto the error taxonomy. The service answers a
/// stale write with 409.
fn status_error(id: Option<u64>, status: StatusCode, body: String) -> ApiError {
    match (status, id) {
        (StatusCode::CONFLICT, Some(id)) => ApiError::VersionConflict { id },
        (StatusCode::NOT_FOUND, Some(id)) => ApiError::NotFound(id),
        _ => ApiError::Rejected {
            status: status.as_u16(),
            message: rejection_message(&body),
        },
    }
}

/// Error bodies are usually empty. Some deployments put the reason into
/// `{"error": "..."}`, anything else is passed through as is.
fn rejection_message(body: &str) -> String {
    if body.trim().is_empty() {
        return "no details provided".into();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|message| message.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

/// [TrackerApi] over the service's REST endpoints.
pub struct HttpTrackerApi {
    base_url: String,
    client: Client,
}

impl HttpTrackerApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: Client::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/tracker", self.base_url)
    }

    fn tracker_url(&self, id: u64) -> String {
        format!("{}/tracker/{id}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(
        id: Option<u64>,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(id, status, body))
        }
    }
}

#[async_trait]
impl TrackerApi for HttpTrackerApi {
    async fn list(&self, range: Option<TimeRange<Utc>>) -> Result<Vec<TrackerEntity>, ApiError> {
        let mut request = self.client.get(self.collection_url());
        if let Some(range) = &range {
            request = request.query(&[
                ("start_date", query_timestamp(range.start)),
                ("end_date", query_timestamp(range.end)),
            ]);
        }

        debug!("Listing trackers within {range:?}");
        let response = request.send().await?;
        Self::decode(None, response).await
    }

    async fn get(&self, id: u64) -> Result<TrackerEntity, ApiError> {
        let response = self.client.get(self.tracker_url(id)).send().await?;
        Self::decode(Some(id), response).await
    }

    async fn create(&self, draft: NewTracker) -> Result<TrackerEntity, ApiError> {
        debug!("Creating tracker {:?}", draft.name);
        let response = self
            .client
            .post(self.collection_url())
            .json(&draft)
            .send()
            .await?;
        Self::decode(None, response).await
    }

    async fn update(&self, id: u64, update: TrackerUpdate) -> Result<TrackerEntity, ApiError> {
        debug!("Updating tracker {id} at version {}", update.version);
        let response = self
            .client
            .put(self.tracker_url(id))
            .json(&update)
            .send()
            .await?;
        Self::decode(Some(id), response).await
    }

    async fn delete(&self, id: u64) -> Result<(), ApiError> {
        debug!("Deleting tracker {id}");
        let response = self.client.delete(self.tracker_url(id)).send().await?;

        let status = response.status();
        if status.is_success() {
            // The acknowledgement is plain text, not JSON. Success is all we
            // need out of it.
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(Some(id), status, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use reqwest::StatusCode;

    use crate::client::api::ApiError;

    use super::{query_timestamp, rejection_message, status_error, HttpTrackerApi};

    #[test]
    fn query_timestamp_uses_the_millisecond_layout() {
        let moment = Utc.from_utc_datetime(&NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
            NaiveTime::from_hms_opt(9, 5, 7).unwrap(),
        ));

        assert_eq!(query_timestamp(moment), "2024-04-03T09:05:07.000Z");
    }

    #[test]
    fn urls_do_not_double_the_slash() {
        let api = HttpTrackerApi::new("http://localhost:8080/");

        assert_eq!(api.collection_url(), "http://localhost:8080/tracker");
        assert_eq!(api.tracker_url(4), "http://localhost:8080/tracker/4");
    }

    #[test]
    fn conflict_status_becomes_its_own_variant() {
        let error = status_error(Some(3), StatusCode::CONFLICT, String::new());
        assert!(matches!(error, ApiError::VersionConflict { id: 3 }));

        let error = status_error(Some(3), StatusCode::NOT_FOUND, String::new());
        assert!(matches!(error, ApiError::NotFound(3)));
    }

    #[test]
    fn other_failures_carry_the_service_message() {
        let error = status_error(
            None,
            StatusCode::BAD_REQUEST,
            r#"{"error": "name must not be empty"}"#.into(),
        );

        match error {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "name must not be empty");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejection_message_falls_back_to_the_raw_body() {
        assert_eq!(rejection_message(""), "no details provided");
        assert_eq!(rejection_message("boom"), "boom");
        assert_eq!(rejection_message(r#"{"detail": 5}"#), r#"{"detail": 5}"#);
    }
}
