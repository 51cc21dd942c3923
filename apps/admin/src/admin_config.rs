use std::env;
use std::path::PathBuf;

use fieldops_application::DEFAULT_CACHE_TTL_SECONDS;
use fieldops_core::{AppError, AppResult};

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3001/api";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 15;

/// Runtime configuration read from the environment.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the collaborator REST API.
    pub api_base_url: String,
    /// Optional bearer token sent with every request.
    pub api_token: Option<String>,
    /// HTTP request timeout.
    pub http_timeout_seconds: u64,
    /// Lifetime of the cached collaborator list.
    pub cache_ttl_seconds: u32,
    /// JSON array of records served from memory instead of the REST API.
    pub offline_seed_path: Option<PathBuf>,
}

impl AdminConfig {
    /// Loads configuration from environment variables.
    pub fn load() -> AppResult<Self> {
        let api_base_url = env::var("FIELDOPS_API_BASE_URL")
            .ok()
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_token = env::var("FIELDOPS_API_TOKEN")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let http_timeout_seconds =
            parse_env_u64("FIELDOPS_HTTP_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT_SECONDS)?;
        let cache_ttl_seconds =
            parse_env_u32("FIELDOPS_CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS)?;
        let offline_seed_path = env::var("FIELDOPS_OFFLINE_SEED_PATH")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        if http_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "FIELDOPS_HTTP_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token,
            http_timeout_seconds,
            cache_ttl_seconds,
            offline_seed_path,
        })
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
