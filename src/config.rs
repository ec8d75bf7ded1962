use std::env;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::middleware::rate_limiter::RateLimiter;
use crate::repositories::upload_repository::UploadRepository;
use crate::services::media_fetcher::MediaFetcher;
use crate::services::storage::ObjectStore;
use crate::services::upload_service::{UploadPolicy, DEFAULT_MAX_MESSAGE_LENGTH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub s3_bucket_name: String,
    pub s3_public_url: String,
    /// `MAX_UPLOAD_MB` converted to bytes.
    pub max_upload_bytes: usize,
    pub max_message_length: usize,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window: Duration,
}

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStore>,
    pub uploads: Arc<dyn UploadRepository>,
    pub media_fetcher: MediaFetcher,
    pub policy: UploadPolicy,
    pub rate_limiter: Arc<RateLimiter>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let number = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::NotANumber { name, value }),
                None => Ok(default),
            }
        };

        let size = |name: &'static str, default: u64| -> Result<usize, ConfigError> {
            let value = number(name, default)?;
            usize::try_from(value).map_err(|_| ConfigError::NotANumber {
                name,
                value: value.to_string(),
            })
        };

        let max_upload_mb = size("MAX_UPLOAD_MB", 50)?;
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| ConfigError::NotANumber {
                name: "MAX_UPLOAD_MB",
                value: max_upload_mb.to_string(),
            })?;

        let server_port = number("PORT", 3000)?;
        let server_port = u16::try_from(server_port).map_err(|_| ConfigError::NotANumber {
            name: "PORT",
            value: server_port.to_string(),
        })?;

        let s3_endpoint = required("S3_ENDPOINT")?;
        let s3_public_url = lookup("S3_PUBLIC_URL").unwrap_or_else(|| s3_endpoint.clone());

        Ok(Config {
            server_host: or_default("HOST", "0.0.0.0"),
            server_port,
            database_url: required("DATABASE_URL")?,
            s3_endpoint,
            s3_region: or_default("S3_REGION", "us-east-1"),
            s3_access_key: required("S3_ACCESS_KEY")?,
            s3_secret_key: required("S3_SECRET_KEY")?,
            s3_bucket_name: or_default("S3_BUCKET_NAME", "pov-uploads"),
            s3_public_url,
            max_upload_bytes,
            max_message_length: size("MAX_MESSAGE_LENGTH", DEFAULT_MAX_MESSAGE_LENGTH as u64)?,
            rate_limit_max_requests: size("RATE_LIMIT_MAX_REQUESTS", 30)?,
            rate_limit_window: Duration::from_secs(number("RATE_LIMIT_WINDOW_SECS", 60)?),
        })
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_file_size: self.max_upload_bytes,
            max_message_length: self.max_message_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("DATABASE_URL", "postgres://localhost/pov"),
        ("S3_ENDPOINT", "http://localhost:9000"),
        ("S3_ACCESS_KEY", "minio"),
        ("S3_SECRET_KEY", "minio123"),
    ];

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let cfg = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(cfg.server_host, "0.0.0.0");
        assert_eq!(cfg.server_port, 3000);
        assert_eq!(cfg.s3_bucket_name, "pov-uploads");
        assert_eq!(cfg.s3_public_url, "http://localhost:9000");
        assert_eq!(cfg.upload_policy().max_file_size, 50 * 1024 * 1024);
        assert_eq!(cfg.upload_policy().max_message_length, 500);
        assert_eq!(cfg.rate_limit_window, Duration::from_secs(60));
    }

    #[test]
    fn missing_required_value_is_reported_by_name() {
        let err = Config::from_lookup(lookup_from(&REQUIRED[..3])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("S3_SECRET_KEY")));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { name: "PORT", .. }));
    }

    #[test]
    fn upload_ceiling_that_overflows_bytes_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAX_UPLOAD_MB", "18446744073709551615"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { name: "MAX_UPLOAD_MB", .. }));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAX_UPLOAD_MB", "8"));
        let cfg = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(cfg.upload_policy().max_file_size, 8 * 1024 * 1024);
    }
}
