//! Upload orchestration: validate, sign, upload, register.

use crate::api::{ApiClient, ControlPlane};
use crate::models::{Config, PublishedVersion, SignRequest, VersionUploadRequest};
use crate::storage::{ObjectStore, ObjectStoreClient};
use crate::validate::{file_name, validate_app_path};
use crate::Result;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// Progress of a single upload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Validated,
    Signed,
    Uploaded,
    Registered,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Validated => "validated",
            Stage::Signed => "signed",
            Stage::Uploaded => "uploaded",
            Stage::Registered => "registered",
        };
        f.write_str(name)
    }
}

/// Runs the upload pipeline for one artifact.
pub struct App {
    control_plane: Box<dyn ControlPlane>,
    object_store: Box<dyn ObjectStore>,
    app_path: PathBuf,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub control_plane: Box<dyn ControlPlane>,
    pub object_store: Box<dyn ObjectStore>,
}

impl App {
    pub fn with_services(services: AppServices, app_path: PathBuf) -> Self {
        Self {
            control_plane: services.control_plane,
            object_store: services.object_store,
            app_path,
        }
    }

    /// Build an app with real HTTP clients from `config`.
    ///
    /// The control-plane client carries the access token; the object-store
    /// client is a separate instance without it.
    pub fn new(config: &Config) -> Result<Self> {
        let control_plane = ApiClient::from_config(config)?;
        let object_store = ObjectStoreClient::new(config.request_timeout)?;

        match &config.branch_name {
            Some(branch) => info!(
                "Integration {} (branch: {})",
                config.integration_id, branch
            ),
            None => info!("Integration {}", config.integration_id),
        }

        Ok(Self::with_services(
            AppServices {
                control_plane: Box::new(control_plane),
                object_store: Box::new(object_store),
            },
            config.app_path.clone(),
        ))
    }

    /// Run every stage in order, stopping at the first failure.
    pub async fn run(&self) -> Result<PublishedVersion> {
        let mut stage = Stage::Start;
        let result = self.run_stages(&mut stage).await;
        if let Err(e) = &result {
            debug!("Run stopped after stage '{}': {}", stage, e);
        }
        result
    }

    async fn run_stages(&self, stage: &mut Stage) -> Result<PublishedVersion> {
        let path = self.app_path.as_path();

        let platform = validate_app_path(path)?;
        let name = file_name(path)?;
        *stage = Stage::Validated;
        info!("Validated {} ({})", path.display(), platform.as_str());

        let target = self
            .control_plane
            .request_upload_target(&SignRequest {
                platform,
                file_name: name.clone(),
            })
            .await?;
        *stage = Stage::Signed;
        info!("Received upload target {}", target.bucket_key);

        self.object_store.upload(&target.upload_url, path).await?;
        *stage = Stage::Uploaded;
        info!("Uploaded {}", name);

        self.control_plane
            .register_version(&VersionUploadRequest {
                file_name: name.clone(),
                bucket_key: target.bucket_key.clone(),
            })
            .await?;
        *stage = Stage::Registered;
        info!("Registered version {}", name);

        Ok(PublishedVersion {
            platform,
            file_name: name,
            bucket_key: target.bucket_key,
        })
    }
}
