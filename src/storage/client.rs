use super::{ObjectStore, BINARY_CONTENT_TYPE};
use crate::error::{fault_from_response, Step};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;

/// Plain HTTP client for signed-URL uploads.
pub struct ObjectStoreClient {
    client: Client,
}

impl ObjectStoreClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ObjectStore for ObjectStoreClient {
    async fn upload(&self, url: &str, path: &Path) -> Result<()> {
        let file = tokio::fs::File::open(path).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )));
        }
        let size = metadata.len();
        tracing::debug!("Uploading {} ({} bytes)", path.display(), size);

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, BINARY_CONTENT_TYPE)
            .header(CONTENT_LENGTH, size)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("Failed to send upload request: {}", e);
                e
            })?;

        if response.status() != StatusCode::OK {
            return Err(fault_from_response(Step::S3Upload, response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    struct NoAuthorization;

    impl wiremock::Match for NoAuthorization {
        fn matches(&self, request: &Request) -> bool {
            !request.headers.contains_key("authorization")
        }
    }

    #[tokio::test]
    async fn test_upload_streams_exact_file_bytes() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.apk");
        let content: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        fs::write(&file_path, &content).unwrap();

        Mock::given(method("PUT"))
            .and(path("/store/b1"))
            .and(header("Content-Type", "application/octet-stream"))
            .and(header("Content-Length", "70000"))
            .and(NoAuthorization)
            .and(body_bytes(content.clone()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ObjectStoreClient::new(Duration::from_secs(5)).unwrap();
        client
            .upload(&format!("{}/store/b1", server.uri()), &file_path)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_failure_status() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.apk");
        fs::write(&file_path, b"binary").unwrap();

        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({ "message": "signature expired" })),
            )
            .mount(&server)
            .await;

        let client = ObjectStoreClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .upload(&format!("{}/store/b1", server.uri()), &file_path)
            .await
            .unwrap_err();

        let fault = err.remote_fault().unwrap();
        assert_eq!(fault.step, Step::S3Upload);
        assert_eq!(fault.http_status, 403);
        assert_eq!(fault.server_message, "signature expired");
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();

        let client = ObjectStoreClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .upload(&server.uri(), &dir.path().join("gone.apk"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_directory_is_io_error() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();
        let dir_path = dir.path().join("app.apk");
        fs::create_dir(&dir_path).unwrap();

        let client = ObjectStoreClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .upload(&format!("{}/store/b1", server.uri()), &dir_path)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_timeout_is_transport_error() {
        let server = MockServer::start().await;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.apk");
        fs::write(&file_path, b"binary").unwrap();

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = ObjectStoreClient::new(Duration::from_millis(200)).unwrap();
        let err = client
            .upload(&format!("{}/store/b1", server.uri()), &file_path)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(ref e) if e.is_timeout()));
    }
}
