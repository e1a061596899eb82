use serde::{Deserialize, Serialize};

/// Outcome of one platform's publish attempt.
///
/// `Skipped` means the platform was not configured; it is a valid result,
/// not an error. A `Failed` outcome never aborts the sibling platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PublishOutcome {
    Skipped,
    Success { external_id: String },
    Failed { error: String },
}

impl PublishOutcome {
    /// Wire-level status label ("success" / "failed" / "skipped").
    pub fn status_label(&self) -> &'static str {
        match self {
            PublishOutcome::Skipped => "skipped",
            PublishOutcome::Success { .. } => "success",
            PublishOutcome::Failed { .. } => "failed",
        }
    }

    pub fn external_id(&self) -> Option<&str> {
        match self {
            PublishOutcome::Success { external_id } => Some(external_id),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PublishOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Success { .. })
    }
}

/// Combined result of one publish attempt across both platforms.
///
/// Built once per `UploadRequest` after both platform attempts have settled
/// and cleanup ran; immutable afterwards. This is the unit returned to the
/// caller and appended to the result sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub youtube: PublishOutcome,
    pub instagram: PublishOutcome,
    /// Whether the source blob was deleted after both attempts settled.
    pub source_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(PublishOutcome::Skipped.status_label(), "skipped");
        assert_eq!(
            PublishOutcome::Success {
                external_id: "abc".into()
            }
            .status_label(),
            "success"
        );
        assert_eq!(
            PublishOutcome::Failed {
                error: "boom".into()
            }
            .status_label(),
            "failed"
        );
    }

    #[test]
    fn test_accessors() {
        let ok = PublishOutcome::Success {
            external_id: "yt123".into(),
        };
        assert_eq!(ok.external_id(), Some("yt123"));
        assert_eq!(ok.error(), None);
        assert!(ok.is_success());

        let failed = PublishOutcome::Failed {
            error: "processing failed".into(),
        };
        assert_eq!(failed.external_id(), None);
        assert_eq!(failed.error(), Some("processing failed"));
        assert!(!failed.is_success());

        assert_eq!(PublishOutcome::Skipped.external_id(), None);
        assert_eq!(PublishOutcome::Skipped.error(), None);
    }

    #[test]
    fn test_aggregate_result_serializes_with_tagged_outcomes() {
        let result = AggregateResult {
            youtube: PublishOutcome::Success {
                external_id: "vid".into(),
            },
            instagram: PublishOutcome::Skipped,
            source_deleted: true,
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["youtube"]["status"], "success");
        assert_eq!(json["youtube"]["external_id"], "vid");
        assert_eq!(json["instagram"]["status"], "skipped");
        assert_eq!(json["source_deleted"], true);
    }
}
