//! Interactive publish endpoint
//!
//! Resolves the stored video, mints a short-lived source URL, and hands the
//! request to the orchestrator. Once the orchestration starts, the response
//! is always 200 with a complete per-platform result; partial failures
//! (including a failed source-blob deletion) are reported in the body, not as
//! an HTTP error.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crossreel_core::{caption, AggregateResult, UploadRequest};
use crossreel_storage::keys;

#[derive(Debug, Deserialize)]
pub struct PublishParams {
    pub video_filename: String,
    pub caption: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub youtube: String,
    pub youtube_video_id: Option<String>,
    pub youtube_error: Option<String>,
    pub instagram: String,
    pub instagram_media_id: Option<String>,
    pub instagram_error: Option<String>,
    pub file_deleted: bool,
}

impl From<&AggregateResult> for PublishResponse {
    fn from(result: &AggregateResult) -> Self {
        Self {
            youtube: result.youtube.status_label().to_string(),
            youtube_video_id: result.youtube.external_id().map(String::from),
            youtube_error: result.youtube.error().map(String::from),
            instagram: result.instagram.status_label().to_string(),
            instagram_media_id: result.instagram.external_id().map(String::from),
            instagram_error: result.instagram.error().map(String::from),
            file_deleted: result.source_deleted,
        }
    }
}

pub async fn publish_video(
    State(state): State<Arc<AppState>>,
    Json(params): Json<PublishParams>,
) -> Result<Json<PublishResponse>, ApiError> {
    validate_params(&params)?;

    let video_key = keys::video_key(&params.video_filename)?;

    if !state.storage.exists(&video_key).await? {
        return Err(ApiError::NotFound(format!(
            "Video not found: {}",
            params.video_filename
        )));
    }

    // Inability to mint a source URL aborts before any platform attempt.
    let video_locator = state
        .storage
        .presigned_url(&video_key, state.config.source_url_ttl)
        .await?;

    let caption = caption::clean_caption(&params.caption, &params.user_id);
    let request = UploadRequest::new(video_key, video_locator, caption, params.user_id);

    let result = state.orchestrator.publish(&request).await;

    Ok(Json(PublishResponse::from(&result)))
}

fn validate_params(params: &PublishParams) -> Result<(), ApiError> {
    if params.video_filename.trim().is_empty() {
        return Err(ApiError::InvalidInput("video_filename is required".into()));
    }
    if params.caption.trim().is_empty() {
        return Err(ApiError::InvalidInput("caption is required".into()));
    }
    if params.user_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("user_id is required".into()));
    }
    Ok(())
}
