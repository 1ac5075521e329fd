use std::env;
use std::path::PathBuf;

use binance_futures::Credentials;

use crate::error::BotError;

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";
pub const LOG_DIR_VAR: &str = "BOT_LOG_DIR";

const DEFAULT_LOG_DIR: &str = "logs";

/// Loads `.env` from the working directory, if there is one. Variables that
/// are already set win over the file.
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

/// Process environment lookup, the production source for `load_credentials`.
pub fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Reads the API key pair through `lookup`. Missing and blank values are both
/// configuration errors.
pub fn load_credentials<F>(lookup: F) -> Result<Credentials, BotError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = required(&lookup, API_KEY_VAR)?;
    let api_secret = required(&lookup, API_SECRET_VAR)?;
    Ok(Credentials::new(api_key, api_secret))
}

fn required<F>(lookup: &F, name: &str) -> Result<String, BotError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(BotError::Configuration(format!(
            "{name} not found in environment or .env file"
        ))),
    }
}

/// Log directory from `BOT_LOG_DIR`, `logs` by default.
pub fn log_dir<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(LOG_DIR_VAR)
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
}
