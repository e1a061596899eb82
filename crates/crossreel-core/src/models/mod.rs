//! Data models for the application
//!
//! Each sub-module covers one domain area: the publish request handed to the
//! orchestrator and the per-platform / aggregate outcomes it produces.

mod outcome;
mod request;

// Re-export all models for convenient imports
pub use outcome::*;
pub use request::*;
