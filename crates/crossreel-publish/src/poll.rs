//! Container status poll state machine
//!
//! The poll decision is a pure function of (elapsed time, provider status) so
//! the timeout and error-detection logic is testable without real network
//! delays. The sleeping and the status GET live in the Instagram client; this
//! module only decides what the observed status means.

use std::time::Duration;

use serde::Deserialize;

pub const STATUS_FINISHED: &str = "FINISHED";
pub const STATUS_ERROR: &str = "ERROR";

/// Container status as reported by the provider.
///
/// `status_code` is the machine-readable state; `status` carries the
/// human-readable detail used in error messages. Both are optional because a
/// transient status-check failure is represented as an empty status (treated
/// as still in progress).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerStatus {
    pub status_code: Option<String>,
    pub status: Option<String>,
}

/// Next state of the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    InProgress,
    Finished,
    Error(String),
    TimedOut,
}

/// Pure transition: provider status wins over the clock, so a container that
/// finishes (or errors) exactly at the ceiling is still reported as such.
pub fn advance(elapsed: Duration, ceiling: Duration, status: &ContainerStatus) -> PollState {
    match status.status_code.as_deref() {
        Some(STATUS_FINISHED) => PollState::Finished,
        Some(STATUS_ERROR) => PollState::Error(
            status
                .status
                .clone()
                .unwrap_or_else(|| "unknown container processing error".to_string()),
        ),
        _ if elapsed >= ceiling => PollState::TimedOut,
        _ => PollState::InProgress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEILING: Duration = Duration::from_secs(60);

    fn status(code: Option<&str>, detail: Option<&str>) -> ContainerStatus {
        ContainerStatus {
            status_code: code.map(String::from),
            status: detail.map(String::from),
        }
    }

    #[test]
    fn test_in_progress_below_ceiling() {
        let state = advance(
            Duration::from_secs(55),
            CEILING,
            &status(Some("IN_PROGRESS"), None),
        );
        assert_eq!(state, PollState::InProgress);
    }

    #[test]
    fn test_times_out_at_ceiling_exactly() {
        let state = advance(
            Duration::from_secs(60),
            CEILING,
            &status(Some("IN_PROGRESS"), None),
        );
        assert_eq!(state, PollState::TimedOut);
    }

    #[test]
    fn test_does_not_time_out_just_before_ceiling() {
        let state = advance(
            Duration::from_millis(59_999),
            CEILING,
            &status(Some("IN_PROGRESS"), None),
        );
        assert_eq!(state, PollState::InProgress);
    }

    #[test]
    fn test_finished_wins_over_timeout() {
        let state = advance(
            Duration::from_secs(75),
            CEILING,
            &status(Some(STATUS_FINISHED), None),
        );
        assert_eq!(state, PollState::Finished);
    }

    #[test]
    fn test_error_is_immediate_with_detail() {
        let state = advance(
            Duration::from_secs(5),
            CEILING,
            &status(Some(STATUS_ERROR), Some("media format not supported")),
        );
        assert_eq!(
            state,
            PollState::Error("media format not supported".to_string())
        );
    }

    #[test]
    fn test_error_without_detail_gets_placeholder() {
        let state = advance(Duration::from_secs(5), CEILING, &status(Some(STATUS_ERROR), None));
        assert_eq!(
            state,
            PollState::Error("unknown container processing error".to_string())
        );
    }

    #[test]
    fn test_missing_status_counts_as_in_progress() {
        let state = advance(Duration::from_secs(10), CEILING, &ContainerStatus::default());
        assert_eq!(state, PollState::InProgress);
    }

    #[test]
    fn test_missing_status_still_times_out() {
        let state = advance(Duration::from_secs(61), CEILING, &ContainerStatus::default());
        assert_eq!(state, PollState::TimedOut);
    }
}
