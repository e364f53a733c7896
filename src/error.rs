//! Error handling and custom error types
//!
//! Every stage of the upload returns one of these; only `main` turns them
//! into a process exit code.

use std::fmt;
use thiserror::Error;

/// Pipeline step a remote failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SignedUrl,
    S3Upload,
    ScanVersion,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::SignedUrl => "Signed URL",
            Step::S3Upload => "S3 Upload",
            Step::ScanVersion => "Scan Version",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-success response from the control-plane or the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFault {
    pub step: Step,
    pub http_status: u16,
    pub server_message: String,
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step '{}' failed with code {}, server message: {}",
            self.step, self.http_status, self.server_message
        )
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Api(RemoteFault),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn api(step: Step, http_status: u16, server_message: impl Into<String>) -> Self {
        Error::Api(RemoteFault {
            step,
            http_status,
            server_message: server_message.into(),
        })
    }

    /// The remote fault carried by this error, if any.
    pub fn remote_fault(&self) -> Option<&RemoteFault> {
        match self {
            Error::Api(fault) => Some(fault),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Turn a non-success response into an API error for `step`.
///
/// The body is read as `{"message": ...}`; anything else leaves the message empty.
pub(crate) async fn fault_from_response(step: Step, response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let server_error: crate::models::ServerError =
        serde_json::from_str(&body).unwrap_or_default();
    tracing::debug!("{} request failed (status {}): {}", step, status, body);
    Error::api(step, status, server_error.message)
}
