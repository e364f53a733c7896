use anyhow::Result;
use clap::Parser;
use oversecured_uploader::app::App;
use oversecured_uploader::models::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "oversecured-uploader")]
#[command(about = "Upload a mobile app build to Oversecured for scanning")]
struct CliArgs {
    /// Path to the .apk, .aab or .zip artifact (overrides `app_path`).
    #[arg(value_name = "APP_PATH")]
    app_path: Option<PathBuf>,

    /// Branch to register the version under (overrides `branch_name`).
    #[arg(long, value_name = "BRANCH")]
    branch: Option<String>,
}

fn build_config(args: CliArgs) -> oversecured_uploader::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(app_path) = args.app_path {
        config = config.with_app_path(app_path);
    }
    if let Some(branch) = args.branch {
        config = config.with_branch_name(branch);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oversecured_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("oversecured: starting version upload");

    let args = CliArgs::parse();

    let app = match build_config(args).and_then(|config| App::new(&config)) {
        Ok(app) => app,
        Err(e) => {
            error!("oversecured: {}", e);
            std::process::exit(1);
        }
    };

    match app.run().await {
        Ok(published) => {
            info!(
                "oversecured: success ({} uploaded as {})",
                published.file_name, published.bucket_key
            );
            Ok(())
        }
        Err(e) => {
            error!("oversecured: {}", e);
            std::process::exit(1);
        }
    }
}
