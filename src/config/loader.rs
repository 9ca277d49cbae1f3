//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{SignerKind, WalletConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Env var that overrides `signer.kind`.
pub const SIGNER_KIND_ENV_VAR: &str = "AGENT_WALLET_SIGNER";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment override error: {0}")]
    Env(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<WalletConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: WalletConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from `path` if given, otherwise start from defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<WalletConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = WalletConfig::default();
            apply_env_overrides(&mut config)?;
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Apply environment overrides on top of file values.
pub fn apply_env_overrides(config: &mut WalletConfig) -> Result<(), ConfigError> {
    if let Ok(kind) = std::env::var(SIGNER_KIND_ENV_VAR) {
        config.signer.kind = kind
            .parse::<SignerKind>()
            .map_err(|e| ConfigError::Env(format!("{}: {}", SIGNER_KIND_ENV_VAR, e)))?;
    }
    Ok(())
}
