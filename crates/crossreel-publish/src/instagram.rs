//! Container-publish client (Instagram Graph API, Reels)
//!
//! Three phases with a bounded polling loop in the middle:
//!
//! 1. Create a Reels container pointing at the source locator.
//! 2. Poll the container status until FINISHED, with a hard ceiling on total
//!    elapsed time. The decision logic lives in [`crate::poll`]; this module
//!    only sleeps and fetches.
//! 3. Publish the finished container.
//!
//! A fourth, best-effort step disables like/view counts on the published
//! media; its failure is logged and swallowed.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::PublishError;
use crate::poll::{self, ContainerStatus, PollState};
use crate::publisher::{Platform, PlatformPublisher};
use crossreel_core::{InstagramCredentials, PollConfig, UploadRequest};

pub const IG_GRAPH_URL: &str = "https://graph.facebook.com/v21.0";

const MAX_CAPTION_CHARS: usize = 2200;
const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct GraphId {
    id: Option<String>,
}

/// Container-publish client for one account.
pub struct InstagramClient {
    http: reqwest::Client,
    creds: InstagramCredentials,
    graph_url: String,
    poll: PollConfig,
}

impl InstagramClient {
    pub fn new(creds: InstagramCredentials, poll: PollConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for Instagram publish")?;

        Ok(Self {
            http,
            creds,
            graph_url: IG_GRAPH_URL.to_string(),
            poll,
        })
    }

    /// Override the Graph API base URL; used by tests to point at a mock server.
    pub fn with_graph_url(mut self, graph_url: String) -> Self {
        self.graph_url = graph_url;
        self
    }

    /// Phase 1: create a Reels container referencing the source locator.
    async fn create_container(
        &self,
        video_url: &str,
        caption: &str,
    ) -> Result<String, PublishError> {
        let caption: String = caption.chars().take(MAX_CAPTION_CHARS).collect();
        let url = format!("{}/{}/media", self.graph_url, self.creds.account_id);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("media_type", "REELS"),
                ("video_url", video_url),
                ("caption", caption.as_str()),
                ("share_to_feed", "true"),
                ("like_and_view_counts_disabled", "1"),
                ("access_token", self.creds.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PublishError::ContainerCreate(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::ContainerCreate(e.to_string()))?;

        if !status.is_success() || body_has_error(&body) {
            return Err(PublishError::ContainerCreate(format!("{} - {}", status, body)));
        }

        let parsed: GraphId = serde_json::from_str(&body).map_err(|_| {
            PublishError::ContainerCreate(format!("unparseable response: {}", body))
        })?;

        let creation_id = parsed.id.ok_or_else(|| {
            PublishError::ContainerCreate(format!("no container id in response: {}", body))
        })?;

        tracing::info!(creation_id = %creation_id, "Reels container created");
        Ok(creation_id)
    }

    /// One status GET. Transport and parse failures are transient from the
    /// poll loop's perspective; the caller logs and keeps polling.
    async fn container_status(&self, creation_id: &str) -> Result<ContainerStatus> {
        let url = format!("{}/{}", self.graph_url, creation_id);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("fields", "status_code,status"),
                ("access_token", self.creds.access_token.as_str()),
            ])
            .send()
            .await
            .context("container status request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("container status check returned {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("unparseable container status response")
    }

    /// Phase 2: poll until the container is FINISHED or the ceiling passes.
    async fn wait_for_container(&self, creation_id: &str) -> Result<(), PublishError> {
        let started = Instant::now();
        loop {
            tokio::time::sleep(self.poll.interval).await;

            let status = match self.container_status(creation_id).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(creation_id = %creation_id, error = %e, "Container status check failed");
                    ContainerStatus::default()
                }
            };

            match poll::advance(started.elapsed(), self.poll.ceiling, &status) {
                PollState::Finished => {
                    tracing::info!(creation_id = %creation_id, "Container ready");
                    return Ok(());
                }
                PollState::Error(detail) => {
                    return Err(PublishError::ContainerProcessing(detail));
                }
                PollState::TimedOut => {
                    return Err(PublishError::ContainerTimeout(self.poll.ceiling));
                }
                PollState::InProgress => {
                    tracing::debug!(
                        creation_id = %creation_id,
                        status_code = status.status_code.as_deref().unwrap_or("unknown"),
                        elapsed_secs = started.elapsed().as_secs(),
                        "Container still processing"
                    );
                }
            }
        }
    }

    /// Phase 3: publish the finished container.
    async fn publish_container(&self, creation_id: &str) -> Result<String, PublishError> {
        let url = format!("{}/{}/media_publish", self.graph_url, self.creds.account_id);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("creation_id", creation_id),
                ("access_token", self.creds.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PublishError::ContainerPublish(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::ContainerPublish(e.to_string()))?;

        if !status.is_success() || body_has_error(&body) {
            return Err(PublishError::ContainerPublish(format!("{} - {}", status, body)));
        }

        let parsed: GraphId = serde_json::from_str(&body).map_err(|_| {
            PublishError::ContainerPublish(format!("unparseable response: {}", body))
        })?;

        parsed.id.ok_or_else(|| {
            PublishError::ContainerPublish(format!("no media id in response: {}", body))
        })
    }

    /// Best-effort: hide like/view counts on the published media.
    async fn hide_like_counts(&self, media_id: &str) {
        let url = format!("{}/{}", self.graph_url, media_id);
        let result = self
            .http
            .post(&url)
            .query(&[
                ("like_and_view_counts_disabled", "true"),
                ("access_token", self.creds.access_token.as_str()),
            ])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(media_id = %media_id, "Like counts hidden");
            }
            Ok(response) => {
                tracing::warn!(media_id = %media_id, status = %response.status(), "Failed to hide like counts");
            }
            Err(e) => {
                tracing::warn!(media_id = %media_id, error = %e, "Failed to hide like counts");
            }
        }
    }
}

/// Graph API signals failure with an embedded `error` object, sometimes on a
/// 200 response.
fn body_has_error(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .map(|v| v.get("error").is_some())
        .unwrap_or(false)
}

#[async_trait]
impl PlatformPublisher for InstagramClient {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn attempt(&self, request: &UploadRequest) -> Result<String, PublishError> {
        let creation_id = self
            .create_container(&request.video_locator, &request.caption)
            .await?;
        self.wait_for_container(&creation_id).await?;
        let media_id = self.publish_container(&creation_id).await?;

        self.hide_like_counts(&media_id).await;

        tracing::info!(media_id = %media_id, "Instagram Reel published");
        Ok(media_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_creds() -> InstagramCredentials {
        InstagramCredentials {
            access_token: "ig-token".to_string(),
            account_id: "17890".to_string(),
        }
    }

    fn fast_poll() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(10),
            ceiling: Duration::from_millis(100),
        }
    }

    fn client_for(server: &mockito::Server) -> InstagramClient {
        InstagramClient::new(test_creds(), fast_poll())
            .unwrap()
            .with_graph_url(server.url())
    }

    fn request() -> UploadRequest {
        UploadRequest::new("videos/a.mp4", "https://blob.example/a.mp4", "hello", "u1")
    }

    #[tokio::test]
    async fn test_full_publish_success() {
        let mut server = mockito::Server::new_async().await;

        let create = server
            .mock("POST", "/17890/media")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("media_type".into(), "REELS".into()),
                Matcher::UrlEncoded("video_url".into(), "https://blob.example/a.mp4".into()),
                Matcher::UrlEncoded("caption".into(), "hello".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id":"container-1"}"#)
            .create_async()
            .await;

        let status = server
            .mock("GET", "/container-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status_code":"FINISHED","status":"ok"}"#)
            .create_async()
            .await;

        let publish = server
            .mock("POST", "/17890/media_publish")
            .match_body(Matcher::UrlEncoded("creation_id".into(), "container-1".into()))
            .with_status(200)
            .with_body(r#"{"id":"media-9"}"#)
            .create_async()
            .await;

        let hide = server
            .mock("POST", "/media-9")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let media_id = client.attempt(&request()).await.unwrap();

        assert_eq!(media_id, "media-9");
        create.assert_async().await;
        status.assert_async().await;
        publish.assert_async().await;
        hide.assert_async().await;
    }

    #[tokio::test]
    async fn test_processing_error_is_fatal_and_skips_publish() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/17890/media")
            .with_status(200)
            .with_body(r#"{"id":"container-1"}"#)
            .create_async()
            .await;

        server
            .mock("GET", "/container-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status_code":"ERROR","status":"media format not supported"}"#)
            .create_async()
            .await;

        let publish = server
            .mock("POST", "/17890/media_publish")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.attempt(&request()).await.unwrap_err();

        match err {
            PublishError::ContainerProcessing(msg) => {
                assert!(msg.contains("media format not supported"))
            }
            other => panic!("expected ContainerProcessing, got {:?}", other),
        }
        publish.assert_async().await;
    }

    #[tokio::test]
    async fn test_never_finished_times_out() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/17890/media")
            .with_status(200)
            .with_body(r#"{"id":"container-1"}"#)
            .create_async()
            .await;

        server
            .mock("GET", "/container-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status_code":"IN_PROGRESS","status":"working"}"#)
            .expect_at_least(2)
            .create_async()
            .await;

        let client = client_for(&server);
        let started = Instant::now();
        let err = client.attempt(&request()).await.unwrap_err();

        assert!(matches!(err, PublishError::ContainerTimeout(_)));
        // The loop must run to the injected ceiling, not bail early.
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_create_rejection_carries_provider_body() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/17890/media")
            .with_status(400)
            .with_body(r#"{"error":{"message":"Invalid OAuth access token"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.attempt(&request()).await.unwrap_err();

        match err {
            PublishError::ContainerCreate(msg) => {
                assert!(msg.contains("Invalid OAuth access token"))
            }
            other => panic!("expected ContainerCreate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embedded_error_object_on_200_is_rejected() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/17890/media")
            .with_status(200)
            .with_body(r#"{"error":{"message":"Application request limit reached"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.attempt(&request()).await.unwrap_err();

        assert!(matches!(err, PublishError::ContainerCreate(_)));
    }

    #[tokio::test]
    async fn test_transient_status_failure_keeps_polling() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/17890/media")
            .with_status(200)
            .with_body(r#"{"id":"container-1"}"#)
            .create_async()
            .await;

        // First check fails, later checks report finished.
        server
            .mock("GET", "/container-1")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create_async()
            .await;

        server
            .mock("GET", "/container-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status_code":"FINISHED","status":"ok"}"#)
            .create_async()
            .await;

        server
            .mock("POST", "/17890/media_publish")
            .with_status(200)
            .with_body(r#"{"id":"media-9"}"#)
            .create_async()
            .await;

        server
            .mock("POST", "/media-9")
            .match_query(Matcher::Any)
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        let media_id = client.attempt(&request()).await.unwrap();
        assert_eq!(media_id, "media-9");
    }

    #[tokio::test]
    async fn test_hide_like_counts_failure_does_not_fail_publish() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/17890/media")
            .with_status(200)
            .with_body(r#"{"id":"container-1"}"#)
            .create_async()
            .await;

        server
            .mock("GET", "/container-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status_code":"FINISHED","status":"ok"}"#)
            .create_async()
            .await;

        server
            .mock("POST", "/17890/media_publish")
            .with_status(200)
            .with_body(r#"{"id":"media-9"}"#)
            .create_async()
            .await;

        server
            .mock("POST", "/media-9")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"message":"nope"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let media_id = client.attempt(&request()).await.unwrap();
        assert_eq!(media_id, "media-9");
    }
}
