use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::fetch::RetryPolicy;
use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub upload_path: String,
    pub result_path: String,
    pub artifact_path: String,
    pub max_upload_bytes: usize,
    pub fetch_max_attempts: u32,
    pub fetch_backoff_secs: u64,
    pub http_timeout_secs: u64,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            upload_path: "/upload".to_string(),
            result_path: "/checklist_output".to_string(),
            artifact_path: "/relevant-tenders-report".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            fetch_max_attempts: 10,
            fetch_backoff_secs: 3,
            http_timeout_secs: 60,
            data_dir: PathBuf::from("./data"),
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let config = Config {
            backend_url: env_or("BACKEND_URL", defaults.backend_url),
            upload_path: env_or("UPLOAD_PATH", defaults.upload_path),
            result_path: env_or("RESULT_PATH", defaults.result_path),
            artifact_path: env_or("ARTIFACT_PATH", defaults.artifact_path),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            fetch_max_attempts: parse_env("FETCH_MAX_ATTEMPTS", defaults.fetch_max_attempts)?,
            fetch_backoff_secs: parse_env("FETCH_BACKOFF_SECS", defaults.fetch_backoff_secs)?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port: parse_env("PORT", defaults.port)?,
            rust_log: env_or("RUST_LOG", defaults.rust_log),
        };

        ensure!(
            config.fetch_max_attempts >= 1,
            "FETCH_MAX_ATTEMPTS must be at least 1"
        );
        ensure!(
            config.max_upload_bytes > 0,
            "MAX_UPLOAD_BYTES must be greater than 0"
        );
        Ok(config)
    }

    pub fn upload_url(&self) -> String {
        join_url(&self.backend_url, &self.upload_path)
    }

    pub fn result_url(&self) -> String {
        join_url(&self.backend_url, &self.result_path)
    }

    pub fn artifact_url(&self) -> String {
        join_url(&self.backend_url, &self.artifact_path)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.fetch_max_attempts,
            backoff: Duration::from_secs(self.fetch_backoff_secs),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
