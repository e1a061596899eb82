//! Storage key generation
//!
//! Centralized so all backends and the API agree on the key layout.

use crate::traits::{StorageError, StorageResult};

/// Storage key for a source video: `videos/{filename}`.
///
/// Rejects filenames that are empty or could traverse outside the video
/// prefix.
pub fn video_key(filename: &str) -> StorageResult<String> {
    if filename.is_empty() {
        return Err(StorageError::InvalidKey("filename is empty".to_string()));
    }
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "filename contains invalid characters: {}",
            filename
        )));
    }
    Ok(format!("videos/{}", filename))
}
