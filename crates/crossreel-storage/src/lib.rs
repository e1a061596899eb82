//! Crossreel Storage Library
//!
//! Blob-store abstraction for the shared video bucket. The publish core only
//! needs two operations from the store — a time-limited fetch URL for a named
//! object and deletion of a named object — plus an existence check used by the
//! API before starting an attempt.
//!
//! # Storage key format
//!
//! Source videos live under `videos/{filename}`. Keys must not contain `..`
//! or a leading `/`; key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use crossreel_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
