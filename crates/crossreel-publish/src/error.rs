//! Error types for the publish workflow
//!
//! One variant per protocol phase. Every variant carries the provider's raw
//! response (or the transport error) so a Failed outcome is diagnosable from
//! the audit log alone. These errors are caught at the orchestrator boundary
//! and converted to per-platform Failed outcomes; they never cross platforms.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Token exchange returned no access token (or was unreachable).
    #[error("Token exchange failed: {0}")]
    Auth(String),

    /// Resumable-upload session creation failed or returned no session URL.
    #[error("Upload session init failed: {0}")]
    SessionInit(String),

    /// The binary PUT to the session URL was rejected.
    #[error("Video transfer failed: {0}")]
    UploadTransfer(String),

    /// The source video could not be read from its locator.
    #[error("Source video fetch failed: {0}")]
    SourceFetch(String),

    /// Container creation was rejected by the provider.
    #[error("Container creation failed: {0}")]
    ContainerCreate(String),

    /// The provider reported a terminal processing error for the container.
    #[error("Container processing failed: {0}")]
    ContainerProcessing(String),

    /// The container never reached FINISHED within the poll ceiling.
    #[error("Container processing timed out after {}s", .0.as_secs())]
    ContainerTimeout(Duration),

    /// The final publish call was rejected by the provider.
    #[error("Container publish failed: {0}")]
    ContainerPublish(String),
}
