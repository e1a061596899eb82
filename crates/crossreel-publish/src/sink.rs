//! Publish result sink
//!
//! Every completed orchestration appends one record describing the outcome on
//! each platform. Appending is best-effort: a sink failure is logged by the
//! orchestrator and never fails the publish.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crossreel_core::{AggregateResult, UploadRequest};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write result record: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize result record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One line of the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRecord {
    pub recorded_at: DateTime<Utc>,
    pub requester_id: String,
    pub video_key: String,
    pub caption: String,
    pub youtube_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_error: Option<String>,
    pub instagram_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_media_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_error: Option<String>,
    pub source_deleted: bool,
}

impl PublishRecord {
    pub fn new(request: &UploadRequest, result: &AggregateResult) -> Self {
        Self {
            recorded_at: Utc::now(),
            requester_id: request.requester_id.clone(),
            video_key: request.video_key.clone(),
            caption: request.caption.clone(),
            youtube_status: result.youtube.status_label().to_string(),
            youtube_video_id: result.youtube.external_id().map(String::from),
            youtube_error: result.youtube.error().map(String::from),
            instagram_status: result.instagram.status_label().to_string(),
            instagram_media_id: result.instagram.external_id().map(String::from),
            instagram_error: result.instagram.error().map(String::from),
            source_deleted: result.source_deleted,
        }
    }
}

/// Destination for publish records.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn append(&self, record: &PublishRecord) -> Result<(), SinkError>;
}

/// Appends one JSON line per record to a local file.
pub struct JsonlResultSink {
    path: PathBuf,
}

impl JsonlResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResultSink for JsonlResultSink {
    async fn append(&self, record: &PublishRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

/// In-memory sink for tests.
pub struct MemoryResultSink {
    records: tokio::sync::Mutex<Vec<PublishRecord>>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self {
            records: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    pub async fn records(&self) -> Vec<PublishRecord> {
        self.records.lock().await.clone()
    }
}

impl Default for MemoryResultSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultSink for MemoryResultSink {
    async fn append(&self, record: &PublishRecord) -> Result<(), SinkError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossreel_core::PublishOutcome;

    fn sample_record() -> PublishRecord {
        let request = UploadRequest::new("videos/a.mp4", "https://blob/a.mp4", "caption", "u1");
        let result = AggregateResult {
            youtube: PublishOutcome::Success {
                external_id: "yt-1".to_string(),
            },
            instagram: PublishOutcome::Failed {
                error: "container processing failed".to_string(),
            },
            source_deleted: true,
        };
        PublishRecord::new(&request, &result)
    }

    #[test]
    fn test_record_captures_both_outcomes() {
        let record = sample_record();
        assert_eq!(record.youtube_status, "success");
        assert_eq!(record.youtube_video_id.as_deref(), Some("yt-1"));
        assert!(record.youtube_error.is_none());
        assert_eq!(record.instagram_status, "failed");
        assert!(record.instagram_media_id.is_none());
        assert!(record
            .instagram_error
            .as_deref()
            .unwrap()
            .contains("container processing"));
        assert!(record.source_deleted);
    }

    #[tokio::test]
    async fn test_jsonl_sink_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publish_log.jsonl");
        let sink = JsonlResultSink::new(&path);

        sink.append(&sample_record()).await.unwrap();
        sink.append(&sample_record()).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: PublishRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.video_key, "videos/a.mp4");
        assert_eq!(parsed.requester_id, "u1");
    }

    #[tokio::test]
    async fn test_memory_sink_collects_records() {
        let sink = MemoryResultSink::new();
        sink.append(&sample_record()).await.unwrap();

        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].youtube_status, "success");
    }
}
