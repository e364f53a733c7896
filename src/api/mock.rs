use super::ControlPlane;
use crate::error::Step;
use crate::models::{SignRequest, UploadTarget, VersionUploadRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory control-plane that records every call it receives.
#[derive(Clone)]
pub struct MockApiClient {
    target: UploadTarget,
    sign_failure: Option<(u16, String)>,
    register_failure: Option<(u16, String)>,
    sign_requests: Arc<Mutex<Vec<SignRequest>>>,
    version_requests: Arc<Mutex<Vec<VersionUploadRequest>>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self {
            target: UploadTarget {
                bucket_key: "mock-bucket-key".to_string(),
                upload_url: "https://mock-store.example.com/upload".to_string(),
            },
            sign_failure: None,
            register_failure: None,
            sign_requests: Arc::new(Mutex::new(Vec::new())),
            version_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_upload_target(mut self, bucket_key: &str, upload_url: &str) -> Self {
        self.target = UploadTarget {
            bucket_key: bucket_key.to_string(),
            upload_url: upload_url.to_string(),
        };
        self
    }

    pub fn with_sign_failure(mut self, status: u16, message: &str) -> Self {
        self.sign_failure = Some((status, message.to_string()));
        self
    }

    pub fn with_register_failure(mut self, status: u16, message: &str) -> Self {
        self.register_failure = Some((status, message.to_string()));
        self
    }

    pub fn get_sign_count(&self) -> usize {
        self.sign_requests.lock().unwrap().len()
    }

    pub fn get_register_count(&self) -> usize {
        self.version_requests.lock().unwrap().len()
    }

    pub fn get_sign_requests(&self) -> Vec<SignRequest> {
        self.sign_requests.lock().unwrap().clone()
    }

    pub fn get_version_requests(&self) -> Vec<VersionUploadRequest> {
        self.version_requests.lock().unwrap().clone()
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ControlPlane for MockApiClient {
    async fn request_upload_target(&self, request: &SignRequest) -> Result<UploadTarget> {
        self.sign_requests.lock().unwrap().push(request.clone());

        match &self.sign_failure {
            Some((status, message)) => Err(Error::api(Step::SignedUrl, *status, message.clone())),
            None => Ok(self.target.clone()),
        }
    }

    async fn register_version(&self, request: &VersionUploadRequest) -> Result<()> {
        self.version_requests.lock().unwrap().push(request.clone());

        match &self.register_failure {
            Some((status, message)) => {
                Err(Error::api(Step::ScanVersion, *status, message.clone()))
            }
            None => Ok(()),
        }
    }
}
