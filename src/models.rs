//! Data models and structures
//!
//! Wire payloads exchanged with the control-plane API, the artifact
//! platform tag, and the run configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.oversecured.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Derive the platform from the artifact's extension (case-sensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("apk") | Some("aab") => Some(Platform::Android),
            Some("zip") => Some(Platform::Ios),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

// Control-plane API request/response models
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignRequest {
    pub platform: Platform,
    pub file_name: String,
}

/// One-time upload target handed out by the control-plane.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UploadTarget {
    pub bucket_key: String,
    #[serde(rename = "url")]
    pub upload_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VersionUploadRequest {
    pub file_name: String,
    pub bucket_key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerError {
    #[serde(default)]
    pub message: String,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedVersion {
    pub platform: Platform,
    pub file_name: String,
    pub bucket_key: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app_path: PathBuf,
    pub access_token: String,
    pub integration_id: String,
    pub branch_name: Option<String>,
    pub base_url: String,
    /// Per-request limit for every call, including the time to stream the
    /// whole artifact body to the object store. Raise it for large bundles.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| crate::Error::Config(format!("{} not set", key)))
        };

        let request_timeout = match lookup("request_timeout_secs") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("Invalid request_timeout_secs '{}'", raw))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            app_path: PathBuf::from(lookup("app_path").unwrap_or_default().trim()),
            access_token: required("access_token")?,
            integration_id: required("integration_id")?,
            branch_name: lookup("branch_name")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            base_url: lookup("oversecured_api_url")
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
        })
    }

    pub fn with_app_path(mut self, app_path: PathBuf) -> Self {
        self.app_path = app_path;
        self
    }

    pub fn with_branch_name(mut self, branch_name: String) -> Self {
        self.branch_name = Some(branch_name).filter(|value| !value.is_empty());
        self
    }
}
