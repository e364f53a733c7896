use std::fs;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_uploader(server: &MockServer, workdir: &Path, app_path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_oversecured-uploader"))
        .current_dir(workdir)
        .env_clear()
        .env("access_token", "test-token")
        .env("integration_id", "int-1")
        .env("oversecured_api_url", format!("{}/v1", server.uri()))
        .env("request_timeout_secs", "5")
        .env("app_path", app_path)
        .env("NO_COLOR", "1")
        .output()
        .await
        .unwrap()
}

fn error_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .chain(String::from_utf8_lossy(&output.stderr).lines())
        .filter(|line| line.contains("ERROR"))
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_successful_upload_exits_zero() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app_path = dir.path().join("app.apk");
    fs::write(&app_path, b"apk bytes").unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/upload/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "bucket_key": "b1",
            "url": format!("{}/store/b1", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/store/b1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/integrations/int-1/versions/add"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_uploader(&server, dir.path(), &app_path).await;

    assert_eq!(output.status.code(), Some(0));
    assert!(error_lines(&output).is_empty());
}

#[tokio::test]
async fn test_invalid_extension_exits_one() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app_path = dir.path().join("app.txt");
    fs::write(&app_path, b"text").unwrap();

    let output = run_uploader(&server, dir.path(), &app_path).await;

    assert_eq!(output.status.code(), Some(1));
    let errors = error_lines(&output);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("invalid extension"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_refused_sign_request_exits_one() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app_path = dir.path().join("app.apk");
    fs::write(&app_path, b"apk bytes").unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/upload/app"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({ "message": "quota exceeded" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_uploader(&server, dir.path(), &app_path).await;

    assert_eq!(output.status.code(), Some(1));
    let errors = error_lines(&output);
    assert_eq!(errors.len(), 1);
    assert!(errors[0]
        .contains("Step 'Signed URL' failed with code 403, server message: quota exceeded"));
}
