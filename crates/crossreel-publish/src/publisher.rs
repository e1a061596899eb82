//! Platform publisher abstraction
//!
//! One operation: attempt to publish a video on one platform. The
//! orchestrator holds both platforms behind this trait and runs them
//! concurrently, so neither protocol's latency (notably the container poll
//! loop) serializes with the other.

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;

use crate::error::PublishError;
use crossreel_core::UploadRequest;

/// Destination platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Youtube,
    Instagram,
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Platform::Youtube => write!(f, "youtube"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

/// A single-shot publish attempt against one platform.
///
/// Implementations are fail-fast with no internal retries; re-running a
/// failed attempt is the orchestrator caller's decision.
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    fn platform(&self) -> Platform;

    /// Publish the request's video and return the provider's identifier for
    /// the published media.
    async fn attempt(&self, request: &UploadRequest) -> Result<String, PublishError>;
}
