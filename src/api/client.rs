use super::ControlPlane;
use crate::error::{fault_from_response, Step};
use crate::models::{Config, SignRequest, UploadTarget, VersionUploadRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Authenticated client for the control-plane API.
///
/// The access token rides along as a default header on every request, so the
/// object-store upload must never go through this client.
pub struct ApiClient {
    client: Client,
    base_url: String,
    integration_id: String,
    branch_name: Option<String>,
}

impl ApiClient {
    pub fn new(
        access_token: &str,
        integration_id: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(access_token)
            .map_err(|_| Error::Config("access_token is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            integration_id,
            branch_name: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(
            &config.access_token,
            config.integration_id.clone(),
            config.base_url.clone(),
            config.request_timeout,
        )?;
        Ok(match &config.branch_name {
            Some(branch) => client.with_branch(branch.clone()),
            None => client,
        })
    }

    pub fn with_branch(mut self, branch_name: String) -> Self {
        self.branch_name = Some(branch_name);
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("Invalid API base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!("API base URL '{}' cannot have a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn add_version_url(&self) -> Result<Url> {
        match &self.branch_name {
            Some(branch) => self.endpoint(&[
                "integrations",
                self.integration_id.as_str(),
                "branches",
                branch.as_str(),
                "versions",
                "add",
            ]),
            None => self.endpoint(&[
                "integrations",
                self.integration_id.as_str(),
                "versions",
                "add",
            ]),
        }
    }
}

#[async_trait]
impl ControlPlane for ApiClient {
    async fn request_upload_target(&self, request: &SignRequest) -> Result<UploadTarget> {
        let url = self.endpoint(&["upload", "app"])?;
        tracing::debug!("Requesting upload target for {}", request.file_name);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("Failed to send signed URL request: {}", e);
                e
            })?;

        if response.status() != StatusCode::OK {
            return Err(fault_from_response(Step::SignedUrl, response).await);
        }

        let body = response.text().await?;
        let target: UploadTarget = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Failed to parse upload target: {}\nBody: {}", e, body);
            Error::api(
                Step::SignedUrl,
                StatusCode::OK.as_u16(),
                format!("malformed upload target: {}", e),
            )
        })?;

        if target.bucket_key.is_empty() || target.upload_url.is_empty() {
            return Err(Error::api(
                Step::SignedUrl,
                StatusCode::OK.as_u16(),
                "upload target is missing bucket_key or url",
            ));
        }

        Ok(target)
    }

    async fn register_version(&self, request: &VersionUploadRequest) -> Result<()> {
        let url = self.add_version_url()?;
        tracing::debug!("Registering version {} at {}", request.bucket_key, url.path());

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("Failed to send version request: {}", e);
                e
            })?;

        if response.status() != StatusCode::OK {
            return Err(fault_from_response(Step::ScanVersion, response).await);
        }

        Ok(())
    }
}
