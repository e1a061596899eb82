//! Configuration module
//!
//! Environment is read exactly once into an explicit [`Config`] struct which
//! is then passed into constructors. The publish core never reads env vars
//! ambiently, so tests can substitute any configuration (including absent
//! platform credentials) without process-level mutation.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_POLL_CEILING_SECS: u64 = 60;
const DEFAULT_SOURCE_URL_TTL_SECS: u64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Credentials for the resumable-upload platform (YouTube Data API).
///
/// Present only when every field is non-empty; an absent set means
/// "platform not configured" and produces a Skipped outcome.
#[derive(Debug, Clone)]
pub struct YoutubeCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl YoutubeCredentials {
    /// Build a credential set from optional parts; `None` unless all three
    /// parts are present and non-empty.
    pub fn from_parts(
        client_id: Option<String>,
        client_secret: Option<String>,
        refresh_token: Option<String>,
    ) -> Option<Self> {
        match (client_id, client_secret, refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token))
                if !client_id.is_empty()
                    && !client_secret.is_empty()
                    && !refresh_token.is_empty() =>
            {
                Some(Self {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ => None,
        }
    }
}

/// Credentials for the container-publish platform (Instagram Graph API).
#[derive(Debug, Clone)]
pub struct InstagramCredentials {
    pub access_token: String,
    pub account_id: String,
}

impl InstagramCredentials {
    /// Build a credential set from optional parts; `None` unless both parts
    /// are present and non-empty.
    pub fn from_parts(access_token: Option<String>, account_id: Option<String>) -> Option<Self> {
        match (access_token, account_id) {
            (Some(access_token), Some(account_id))
                if !access_token.is_empty() && !account_id.is_empty() =>
            {
                Some(Self {
                    access_token,
                    account_id,
                })
            }
            _ => None,
        }
    }
}

/// Timing for the container status poll loop.
///
/// Production values are 5 s / 60 s; tests inject millisecond-scale values so
/// timeout behavior is exercised without real waits.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub ceiling: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            ceiling: Duration::from_secs(DEFAULT_POLL_CEILING_SECS),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Platform credentials (either may be absent → that platform is skipped)
    pub youtube: Option<YoutubeCredentials>,
    pub instagram: Option<InstagramCredentials>,
    pub youtube_privacy_status: String,
    // Publish behavior
    pub poll: PollConfig,
    pub source_url_ttl: Duration,
    pub result_log_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => s.parse()?,
            Err(_) => StorageBackend::S3,
        };

        Ok(Self {
            server_port: parse_var("PORT", DEFAULT_SERVER_PORT)?,
            environment,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            youtube: YoutubeCredentials::from_parts(
                env::var("YT_CLIENT_ID").ok(),
                env::var("YT_CLIENT_SECRET").ok(),
                env::var("YT_REFRESH_TOKEN").ok(),
            ),
            instagram: InstagramCredentials::from_parts(
                env::var("IG_ACCESS_TOKEN").ok(),
                env::var("IG_USER_ID").ok(),
            ),
            youtube_privacy_status: env::var("YT_PRIVACY_STATUS")
                .unwrap_or_else(|_| "unlisted".to_string()),
            poll: PollConfig {
                interval: Duration::from_secs(parse_var(
                    "IG_POLL_INTERVAL_SECS",
                    DEFAULT_POLL_INTERVAL_SECS,
                )?),
                ceiling: Duration::from_secs(parse_var(
                    "IG_POLL_MAX_WAIT_SECS",
                    DEFAULT_POLL_CEILING_SECS,
                )?),
            },
            source_url_ttl: Duration::from_secs(parse_var(
                "SOURCE_URL_TTL_SECS",
                DEFAULT_SOURCE_URL_TTL_SECS,
            )?),
            result_log_path: env::var("RESULT_LOG_PATH")
                .unwrap_or_else(|_| "publish_log.jsonl".to_string()),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} must be a number, got '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_credentials_require_all_parts() {
        assert!(YoutubeCredentials::from_parts(
            Some("id".into()),
            Some("secret".into()),
            Some("refresh".into())
        )
        .is_some());

        assert!(YoutubeCredentials::from_parts(
            Some("id".into()),
            None,
            Some("refresh".into())
        )
        .is_none());

        // Empty strings count as absent, not configured.
        assert!(YoutubeCredentials::from_parts(
            Some("id".into()),
            Some("".into()),
            Some("refresh".into())
        )
        .is_none());
    }

    #[test]
    fn test_instagram_credentials_require_both_parts() {
        assert!(
            InstagramCredentials::from_parts(Some("token".into()), Some("123".into())).is_some()
        );
        assert!(InstagramCredentials::from_parts(Some("token".into()), None).is_none());
        assert!(InstagramCredentials::from_parts(Some("".into()), Some("123".into())).is_none());
    }

    #[test]
    fn test_poll_config_defaults() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval, Duration::from_secs(5));
        assert_eq!(poll.ceiling, Duration::from_secs(60));
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("s3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "LOCAL".parse::<StorageBackend>().unwrap(),
            StorageBackend::Local
        );
        assert!("nfs".parse::<StorageBackend>().is_err());
    }
}
