//! Resumable-upload client (YouTube Data API v3)
//!
//! Two phases, no intermediate persistence:
//!
//! 1. Session init: POST the video metadata with the declared content type
//!    and byte length; the provider answers with a single-use session URL in
//!    the `Location` header.
//! 2. Binary transfer: one PUT of the full payload to the session URL.
//!
//! Single pass, fail-fast. Resumable sessions are single-use, so the correct
//! retry unit is a fresh attempt from the orchestrator's caller, not a retry
//! inside this client. When the PUT is rejected the client issues a
//! best-effort DELETE to the session URL so the provider-side session is not
//! knowingly leaked.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::PublishError;
use crate::publisher::{Platform, PlatformPublisher};
use crate::token;
use crossreel_core::{caption, UploadRequest, YoutubeCredentials};

pub const YT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const YT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

const VIDEO_CATEGORY_PEOPLE_AND_BLOGS: &str = "22";
const UPLOAD_TAG: &str = "shorts";
const VIDEO_CONTENT_TYPE: &str = "video/*";
const MAX_DESCRIPTION_CHARS: usize = 5000;
const HTTP_TIMEOUT_SECS: u64 = 300;

/// Ephemeral resumable-upload session: created by session init, consumed by
/// the binary PUT, never persisted or reused across requests.
struct UploadSession {
    upload_url: String,
    content_length: u64,
}

#[derive(Debug, Serialize)]
struct SessionMetadata<'a> {
    snippet: Snippet<'a>,
    status: UploadStatus<'a>,
}

#[derive(Debug, Serialize)]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    tags: [&'static str; 1],
    #[serde(rename = "categoryId")]
    category_id: &'static str,
}

#[derive(Debug, Serialize)]
struct UploadStatus<'a> {
    #[serde(rename = "privacyStatus")]
    privacy_status: &'a str,
    #[serde(rename = "selfDeclaredMadeForKids")]
    self_declared_made_for_kids: bool,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

/// Resumable-upload client for one credential set.
pub struct YoutubeClient {
    http: reqwest::Client,
    creds: YoutubeCredentials,
    privacy_status: String,
    token_url: String,
    upload_url: String,
}

impl YoutubeClient {
    pub fn new(creds: YoutubeCredentials, privacy_status: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for YouTube upload")?;

        Ok(Self {
            http,
            creds,
            privacy_status,
            token_url: YT_TOKEN_URL.to_string(),
            upload_url: YT_UPLOAD_URL.to_string(),
        })
    }

    /// Override the provider endpoints; used by tests to point at a mock server.
    pub fn with_endpoints(mut self, token_url: String, upload_url: String) -> Self {
        self.token_url = token_url;
        self.upload_url = upload_url;
        self
    }

    /// Fetch the full video payload from the source locator.
    async fn fetch_source(&self, locator: &str) -> Result<Bytes, PublishError> {
        let response = self
            .http
            .get(locator)
            .send()
            .await
            .map_err(|e| PublishError::SourceFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::SourceFetch(format!(
                "source locator returned {}",
                status
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| PublishError::SourceFetch(e.to_string()))
    }

    /// Phase 1: create the resumable-upload session.
    async fn init_session(
        &self,
        access_token: &str,
        title: &str,
        description: &str,
        content_length: u64,
    ) -> Result<UploadSession, PublishError> {
        let metadata = SessionMetadata {
            snippet: Snippet {
                title,
                description,
                tags: [UPLOAD_TAG],
                category_id: VIDEO_CATEGORY_PEOPLE_AND_BLOGS,
            },
            status: UploadStatus {
                privacy_status: &self.privacy_status,
                self_declared_made_for_kids: false,
            },
        };

        let url = format!("{}?uploadType=resumable&part=snippet,status", self.upload_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header("X-Upload-Content-Type", VIDEO_CONTENT_TYPE)
            .header("X-Upload-Content-Length", content_length.to_string())
            .json(&metadata)
            .send()
            .await
            .map_err(|e| PublishError::SessionInit(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK && status.as_u16() != 308 {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::SessionInit(format!("{} - {}", status, body)));
        }

        let upload_url = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| {
                PublishError::SessionInit("no upload URL in session init response".to_string())
            })?;

        tracing::info!(content_length, "Resumable upload session created");

        Ok(UploadSession {
            upload_url,
            content_length,
        })
    }

    /// Phase 2: stream the payload to the session URL.
    async fn transfer(
        &self,
        access_token: &str,
        session: UploadSession,
        payload: Bytes,
    ) -> Result<String, PublishError> {
        let response = self
            .http
            .put(&session.upload_url)
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
            .header(
                reqwest::header::CONTENT_LENGTH,
                session.content_length.to_string(),
            )
            .body(payload)
            .send()
            .await
            .map_err(|e| PublishError::UploadTransfer(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.abort_session(access_token, &session.upload_url).await;
            return Err(PublishError::UploadTransfer(format!("{} - {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PublishError::UploadTransfer(e.to_string()))?;
        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|_| PublishError::UploadTransfer(format!("unparseable response: {}", body)))?;

        parsed.id.ok_or_else(|| {
            PublishError::UploadTransfer(format!("no video id in upload response: {}", body))
        })
    }

    /// Best-effort abort of a created session so a failed transfer does not
    /// leak provider-side state. Failures here are logged and swallowed.
    async fn abort_session(&self, access_token: &str, upload_url: &str) {
        match self
            .http
            .delete(upload_url)
            .bearer_auth(access_token)
            .send()
            .await
        {
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Upload session abort sent");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Upload session abort failed");
            }
        }
    }
}

#[async_trait]
impl PlatformPublisher for YoutubeClient {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    async fn attempt(&self, request: &UploadRequest) -> Result<String, PublishError> {
        let access_token =
            token::refresh_access_token(&self.http, &self.token_url, &self.creds).await?;

        // Payload length must be declared at session init, so fetch first.
        let payload = self.fetch_source(&request.video_locator).await?;

        let title = caption::video_title(&request.caption);
        let description: String = request.caption.chars().take(MAX_DESCRIPTION_CHARS).collect();

        let session = self
            .init_session(&access_token, &title, &description, payload.len() as u64)
            .await?;
        let video_id = self.transfer(&access_token, session, payload).await?;

        tracing::info!(video_id = %video_id, "YouTube upload complete");
        Ok(video_id)
    }
}
