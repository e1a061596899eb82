use serde::{Deserialize, Serialize};

/// A single publish request: one video, one caption, one requester.
///
/// Built once by the caller (HTTP handler or scheduled job) and consumed
/// exactly once by the orchestrator. The `video_locator` is a time-limited
/// signed URL; it is expected to stay valid for the duration of the attempt
/// (roughly ten minutes) and is never refreshed mid-flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Storage key of the source video in the shared blob store.
    pub video_key: String,
    /// Time-limited fetch URL for the video payload.
    pub video_locator: String,
    /// Caption used for both platforms (truncated per-platform where needed).
    pub caption: String,
    /// Opaque identifier of whoever asked for the publish.
    pub requester_id: String,
}

impl UploadRequest {
    pub fn new(
        video_key: impl Into<String>,
        video_locator: impl Into<String>,
        caption: impl Into<String>,
        requester_id: impl Into<String>,
    ) -> Self {
        Self {
            video_key: video_key.into(),
            video_locator: video_locator.into(),
            caption: caption.into(),
            requester_id: requester_id.into(),
        }
    }
}
