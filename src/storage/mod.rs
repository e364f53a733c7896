//! Object storage upload
//!
//! Pushes the artifact bytes to the signed URL handed out by the
//! control-plane. The URL is the only credential; no API token is sent.

pub mod client;
pub mod mock;

pub use client::ObjectStoreClient;
pub use mock::MockObjectStore;

use crate::Result;
use async_trait::async_trait;
use std::path::Path;

pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `path` to `url` in a single PUT.
    async fn upload(&self, url: &str, path: &Path) -> Result<()>;
}
