//! Crossreel Publish Library
//!
//! The multi-destination publish workflow. Given one video (addressable by a
//! time-limited fetch URL) and a caption, the [`PublishOrchestrator`] drives
//! both platform clients concurrently:
//!
//! - [`YoutubeClient`] — two-phase resumable upload (session init, binary PUT)
//! - [`InstagramClient`] — container create / status poll / publish
//!
//! One platform's failure never blocks the other. After both attempts settle
//! the source blob is deleted exactly once and the aggregate outcome is
//! appended to the result sink; both side effects are best-effort.
//!
//! No component here retries. A failed attempt is retried by the caller
//! re-submitting the request while the source locator is still valid.

pub mod error;
pub mod instagram;
pub mod orchestrator;
pub mod poll;
pub mod publisher;
pub mod sink;
mod token;
pub mod youtube;

// Re-export commonly used types
pub use error::PublishError;
pub use instagram::InstagramClient;
pub use orchestrator::PublishOrchestrator;
pub use publisher::{Platform, PlatformPublisher};
pub use sink::{JsonlResultSink, MemoryResultSink, PublishRecord, ResultSink, SinkError};
pub use youtube::YoutubeClient;
