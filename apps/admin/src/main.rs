//! FieldOps collaborator administration command line.

#![forbid(unsafe_code)]

mod admin_config;
mod commands;

use std::sync::Arc;
use std::time::Duration;

use fieldops_application::{CollaboratorRepository, CollaboratorService};
use fieldops_core::{AppError, AppResult};
use fieldops_infrastructure::{
    HttpCollaboratorRepository, InMemoryCollaboratorCache, InMemoryCollaboratorRepository,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::admin_config::AdminConfig;
use crate::commands::AdminCommand;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = AdminCommand::parse(&args)?;
    let config = AdminConfig::load()?;
    let service = build_collaborator_service(&config)?;

    info!(
        api_base_url = %config.api_base_url,
        cache_ttl_seconds = config.cache_ttl_seconds,
        http_timeout_seconds = config.http_timeout_seconds,
        "fieldops-admin started"
    );

    match commands::execute(&service, command).await {
        Ok(output) => {
            let rendered = serde_json::to_string_pretty(&output).map_err(|error| {
                AppError::Internal(format!("failed to render output: {error}"))
            })?;
            println!("{rendered}");
            Ok(())
        }
        Err(AppError::FieldValidation(errors)) => {
            for (field, message) in errors.iter() {
                error!(field, reason = message, "form field rejected");
            }
            Err(AppError::FieldValidation(errors))
        }
        Err(failure) => {
            error!(error = %failure, "command failed");
            Err(failure)
        }
    }
}

fn build_collaborator_service(config: &AdminConfig) -> AppResult<CollaboratorService> {
    let repository: Arc<dyn CollaboratorRepository> = match &config.offline_seed_path {
        Some(seed_path) => {
            let records = commands::read_seed_records(seed_path)?;
            warn!(
                seed_path = %seed_path.display(),
                records = records.len(),
                "offline mode: changes are not persisted"
            );
            Arc::new(InMemoryCollaboratorRepository::seeded(records))
        }
        None => {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_seconds))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;

            Arc::new(HttpCollaboratorRepository::new(
                http_client,
                config.api_base_url.as_str(),
                config.api_token.clone(),
            )?)
        }
    };
    let cache = Arc::new(InMemoryCollaboratorCache::new());

    Ok(CollaboratorService::new(repository, cache).with_cache_ttl_seconds(config.cache_ttl_seconds))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
