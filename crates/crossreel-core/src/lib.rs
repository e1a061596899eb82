//! Crossreel Core Library
//!
//! This crate provides the domain models, caption helpers, and configuration
//! shared across all Crossreel components.

pub mod caption;
pub mod config;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ConfigError, InstagramCredentials, PollConfig, YoutubeCredentials};
pub use models::{AggregateResult, PublishOutcome, UploadRequest};
pub use storage_types::StorageBackend;
