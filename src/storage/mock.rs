use super::ObjectStore;
use crate::error::Step;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Object store that keeps uploads in memory, keyed by URL.
#[derive(Clone)]
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    upload_count: Arc<Mutex<usize>>,
    failure_status: Option<u16>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            upload_count: Arc::new(Mutex::new(0)),
            failure_status: None,
        }
    }

    pub fn with_failure_status(mut self, status: u16) -> Self {
        self.failure_status = Some(status);
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    pub fn get_objects(&self) -> HashMap<String, Vec<u8>> {
        self.objects.lock().unwrap().clone()
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(&self, url: &str, path: &Path) -> Result<()> {
        *self.upload_count.lock().unwrap() += 1;

        let data = tokio::fs::read(path).await?;
        if let Some(status) = self.failure_status {
            return Err(Error::api(Step::S3Upload, status, ""));
        }

        self.objects.lock().unwrap().insert(url.to_string(), data);
        Ok(())
    }
}
