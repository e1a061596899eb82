//! OAuth2 refresh-token exchange for the resumable-upload platform.
//!
//! A single exchange per attempt; the bearer token lives only for the
//! in-flight request and is never cached or persisted. A failed exchange
//! fails the whole resumable-upload attempt — there are no retries here.

use serde::Deserialize;

use crate::error::PublishError;
use crossreel_core::YoutubeCredentials;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchange a long-lived refresh token for a short-lived bearer token.
pub(crate) async fn refresh_access_token(
    http: &reqwest::Client,
    token_url: &str,
    creds: &YoutubeCredentials,
) -> Result<String, PublishError> {
    let response = http
        .post(token_url)
        .form(&[
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", creds.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await
        .map_err(|e| PublishError::Auth(format!("token endpoint unreachable: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PublishError::Auth(format!("failed to read token response: {}", e)))?;

    if !status.is_success() {
        return Err(PublishError::Auth(format!("{} - {}", status, body)));
    }

    // The raw provider body rides along when no token is present.
    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|_| PublishError::Auth(format!("unparseable token response: {}", body)))?;

    match parsed.access_token {
        Some(token) if !token.is_empty() => {
            tracing::info!("Access token obtained");
            Ok(token)
        }
        _ => Err(PublishError::Auth(format!(
            "no access token in response: {}",
            body
        ))),
    }
}
