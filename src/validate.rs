//! Local artifact validation.

use crate::models::Platform;
use crate::{Error, Result};
use std::path::Path;

/// Check that `path` names an existing artifact and derive its platform.
pub fn validate_app_path(path: &Path) -> Result<Platform> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidInput(
            "App file path is empty. Set 'app_path' to the built artifact.".to_string(),
        ));
    }

    let platform = Platform::from_path(path).ok_or_else(|| {
        Error::InvalidInput(format!(
            "App file '{}' has invalid extension. Only '.apk', '.aab' and '.zip' are allowed.",
            path.display()
        ))
    })?;

    if !path.exists() {
        return Err(Error::InvalidInput(format!(
            "App file '{}' doesn't exist. Make sure the build step produced it before uploading.",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(Error::InvalidInput(format!(
            "App file '{}' is not a regular file.",
            path.display()
        )));
    }

    Ok(platform)
}

/// Base name sent to the control-plane for this artifact.
pub fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::InvalidInput(format!("Invalid app file name: {}", path.display()))
        })
}
