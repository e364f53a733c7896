//! Control-plane API integration
//!
//! Exchanges artifact metadata for a signed upload target and registers the
//! uploaded object as a new version of the integration.

pub mod client;
pub mod mock;

pub use client::ApiClient;
pub use mock::MockApiClient;

use crate::models::{SignRequest, UploadTarget, VersionUploadRequest};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn request_upload_target(&self, request: &SignRequest) -> Result<UploadTarget>;
    async fn register_version(&self, request: &VersionUploadRequest) -> Result<()>;
}
