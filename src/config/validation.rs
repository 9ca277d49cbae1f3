//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the selected signer backend has what it needs
//! - Validate value ranges and socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{SignerKind, WalletConfig};

/// Longest plan lifetime accepted from configuration (30 days).
pub const MAX_PLAN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be > 0"));
    }

    if config.planner.plan_ttl_secs == 0 {
        errors.push(ValidationError::new("planner.plan_ttl_secs", "must be > 0"));
    } else if config.planner.plan_ttl_secs > MAX_PLAN_TTL_SECS {
        errors.push(ValidationError::new(
            "planner.plan_ttl_secs",
            format!("must be <= {}", MAX_PLAN_TTL_SECS),
        ));
    }

    let signer = &config.signer;
    if signer.supported_chains.is_empty() {
        errors.push(ValidationError::new("signer.supported_chains", "must not be empty"));
    }
    match signer.kind {
        SignerKind::Mock => {
            for (i, binding) in signer.mock_wallets.iter().enumerate() {
                if binding.wallet_id.trim().is_empty() || binding.address.trim().is_empty() {
                    errors.push(ValidationError::new(
                        &format!("signer.mock_wallets[{}]", i),
                        "wallet_id and address must be non-empty",
                    ));
                }
            }
        }
        SignerKind::Env => {
            if signer.env_wallets.is_empty() {
                errors.push(ValidationError::new(
                    "signer.env_wallets",
                    "env signer needs at least one wallet",
                ));
            }
            if signer.key_env_prefix.is_empty() {
                errors.push(ValidationError::new("signer.key_env_prefix", "must not be empty"));
            }
        }
        SignerKind::Vault => {
            if signer.vault_url.is_none() {
                errors.push(ValidationError::new(
                    "signer.vault_url",
                    "vault signer needs a vault_url",
                ));
            }
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WalletConfig::default()).is_ok());
    }

    #[test]
    fn test_plan_ttl_bounds() {
        let mut config = WalletConfig::default();
        config.planner.plan_ttl_secs = MAX_PLAN_TTL_SECS;
        assert!(validate_config(&config).is_ok());

        for ttl in [MAX_PLAN_TTL_SECS + 1, u64::MAX] {
            config.planner.plan_ttl_secs = ttl;
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "planner.plan_ttl_secs");
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = WalletConfig::default();
        config.server.bind_address = "nowhere".into();
        config.planner.plan_ttl_secs = 0;
        config.signer.kind = SignerKind::Vault;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["server.bind_address", "planner.plan_ttl_secs", "signer.vault_url"]
        );
    }

    #[test]
    fn test_env_signer_needs_wallets() {
        let mut config = WalletConfig::default();
        config.signer.kind = SignerKind::Env;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "signer.env_wallets");
        assert!(errors[0].to_string().contains("at least one wallet"));
    }
}
