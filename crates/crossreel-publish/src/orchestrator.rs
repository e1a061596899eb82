//! Multi-platform publish orchestration
//!
//! Runs the configured platform attempts concurrently, then performs the
//! shared side effects exactly once: deleting the source blob and appending
//! the audit record. A platform failure is data (a `Failed` outcome), not an
//! early return, so one platform's outage never suppresses the other's
//! publish or the cleanup.

use std::sync::Arc;

use anyhow::Result;

use crate::instagram::InstagramClient;
use crate::publisher::PlatformPublisher;
use crate::sink::{PublishRecord, ResultSink};
use crate::youtube::YoutubeClient;
use crossreel_core::{AggregateResult, Config, PublishOutcome, UploadRequest};
use crossreel_storage::Storage;

pub struct PublishOrchestrator {
    youtube: Option<Arc<dyn PlatformPublisher>>,
    instagram: Option<Arc<dyn PlatformPublisher>>,
    storage: Arc<dyn Storage>,
    sink: Arc<dyn ResultSink>,
}

impl PublishOrchestrator {
    pub fn new(
        youtube: Option<Arc<dyn PlatformPublisher>>,
        instagram: Option<Arc<dyn PlatformPublisher>>,
        storage: Arc<dyn Storage>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            youtube,
            instagram,
            storage,
            sink,
        }
    }

    /// Build platform clients from whatever credentials the config carries.
    /// A platform with no credentials is absent, and every request reports it
    /// as skipped.
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
        sink: Arc<dyn ResultSink>,
    ) -> Result<Self> {
        let youtube: Option<Arc<dyn PlatformPublisher>> = match &config.youtube {
            Some(creds) => Some(Arc::new(YoutubeClient::new(
                creds.clone(),
                config.youtube_privacy_status.clone(),
            )?)),
            None => {
                tracing::warn!("YouTube credentials not configured, uploads will be skipped");
                None
            }
        };

        let instagram: Option<Arc<dyn PlatformPublisher>> = match &config.instagram {
            Some(creds) => Some(Arc::new(InstagramClient::new(creds.clone(), config.poll)?)),
            None => {
                tracing::warn!("Instagram credentials not configured, publishes will be skipped");
                None
            }
        };

        Ok(Self::new(youtube, instagram, storage, sink))
    }

    /// Publish one video to every configured platform, delete the source
    /// blob, and record the aggregate outcome.
    pub async fn publish(&self, request: &UploadRequest) -> AggregateResult {
        tracing::info!(
            video_key = %request.video_key,
            requester_id = %request.requester_id,
            "Starting publish"
        );

        let (youtube, instagram) = tokio::join!(
            run_attempt(self.youtube.as_deref(), request),
            run_attempt(self.instagram.as_deref(), request),
        );

        // Both attempts have settled; the source blob is no longer needed
        // regardless of how either one went.
        let source_deleted = match self.storage.delete(&request.video_key).await {
            Ok(()) => {
                tracing::info!(video_key = %request.video_key, "Source blob deleted");
                true
            }
            Err(e) => {
                tracing::warn!(video_key = %request.video_key, error = %e, "Failed to delete source blob");
                false
            }
        };

        let result = AggregateResult {
            youtube,
            instagram,
            source_deleted,
        };

        let record = PublishRecord::new(request, &result);
        if let Err(e) = self.sink.append(&record).await {
            tracing::warn!(video_key = %request.video_key, error = %e, "Failed to record publish result");
        }

        result
    }
}

async fn run_attempt(
    publisher: Option<&dyn PlatformPublisher>,
    request: &UploadRequest,
) -> PublishOutcome {
    let Some(publisher) = publisher else {
        return PublishOutcome::Skipped;
    };

    let platform = publisher.platform();
    match publisher.attempt(request).await {
        Ok(external_id) => {
            tracing::info!(%platform, %external_id, "Publish succeeded");
            PublishOutcome::Success { external_id }
        }
        Err(e) => {
            tracing::warn!(%platform, error = %e, "Publish failed");
            PublishOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
