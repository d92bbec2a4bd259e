use std::env;

use anyhow::{Context, Result};
use appchains::{AppChains, AppChainsConfig, ResultValue};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine, everything can come from the environment.
    let _ = dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
        )
        .init();

    let config = AppChainsConfig::from_env()?;
    let remote_method = env::var("APPCHAINS_REMOTE_METHOD")
        .unwrap_or_else(|_| "StartApp".to_string());
    let app_code = env::var("APPCHAINS_APP_CODE")
        .context("APPCHAINS_APP_CODE must be set! Check your .env file!")?;
    let datasource_id = env::var("APPCHAINS_DATASOURCE_ID")
        .context("APPCHAINS_DATASOURCE_ID must be set! Check your .env file!")?;
    let output_dir = env::var("APPCHAINS_OUTPUT_DIR").ok();

    info!("Requesting {} report from {}...", app_code, config.hostname);
    let client = AppChains::from_config(config)?;
    let report = client
        .get_report(&remote_method, &app_code, &datasource_id)
        .await?;

    if !report.succeeded {
        warn!("Report job finished without success");
    }

    for result in &report.results {
        match &result.value {
            ResultValue::Text(text) => info!("{}: {}", result.name, text),
            ResultValue::File(file) => {
                info!("{}: {} ({})", result.name, file.name, file.url);
                if let Some(dir) = &output_dir {
                    client.save_file_to(file, dir).await?;
                }
            }
        }
    }

    Ok(())
}
