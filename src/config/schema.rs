//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet
//! service. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tx::types::Chain;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// HTTP adapter settings.
    pub server: ServerConfig,

    /// Signer backend selection and bindings.
    pub signer: SignerConfig,

    /// Plan TTL and gas policy.
    pub planner: PlannerConfig,

    /// Plan/receipt persistence and expiry sweeping.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Which signer backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignerKind {
    #[default]
    Mock,
    Env,
    Vault,
}

impl SignerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerKind::Mock => "mock",
            SignerKind::Env => "env",
            SignerKind::Vault => "vault",
        }
    }
}

impl fmt::Display for SignerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(SignerKind::Mock),
            "env" => Ok(SignerKind::Env),
            "vault" => Ok(SignerKind::Vault),
            other => Err(format!(
                "unknown signer kind '{}' (expected mock, env or vault)",
                other
            )),
        }
    }
}

/// A wallet id → address binding for the mock signer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockWalletConfig {
    pub wallet_id: String,
    pub address: String,
}

/// Signer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Backend: mock, env or vault.
    pub kind: SignerKind,

    /// Chains the backend may operate on.
    pub supported_chains: Vec<Chain>,

    /// Prefix of per-wallet private key env vars (env backend).
    pub key_env_prefix: String,

    /// Wallet ids whose keys are loaded from the environment (env backend).
    pub env_wallets: Vec<String>,

    /// Vault endpoint (vault backend).
    pub vault_url: Option<String>,

    /// Static bindings (mock backend).
    pub mock_wallets: Vec<MockWalletConfig>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            kind: SignerKind::Mock,
            supported_chains: Chain::ALL.to_vec(),
            key_env_prefix: "AGENT_WALLET_KEY_".to_string(),
            env_wallets: Vec::new(),
            vault_url: None,
            mock_wallets: vec![MockWalletConfig {
                wallet_id: "demo-wallet".to_string(),
                address: "0x1234567890123456789012345678901234567890".to_string(),
            }],
        }
    }
}

/// Planner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How long a plan stays executable, in seconds.
    pub plan_ttl_secs: u64,

    /// Fail planning when the signer cannot estimate gas.
    pub require_gas_estimate: bool,

    /// Reference gas price used to derive `estimatedFee`, in gwei.
    pub fee_gas_price_gwei: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            plan_ttl_secs: 3600,
            require_gas_estimate: false,
            fee_gas_price_gwei: 20,
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot file. In-memory only when unset.
    pub persistence_path: Option<String>,

    /// Expiry sweep interval in seconds (0 disables the sweeper).
    pub cleanup_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persistence_path: None,
            cleanup_interval_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WalletConfig::default();
        assert_eq!(config.signer.kind, SignerKind::Mock);
        assert_eq!(config.planner.plan_ttl_secs, 3600);
        assert!(!config.planner.require_gas_estimate);
        assert!(config.store.persistence_path.is_none());
        assert_eq!(config.signer.supported_chains.len(), 6);
    }

    #[test]
    fn test_partial_toml() {
        let config: WalletConfig = toml::from_str(
            r#"
            [signer]
            kind = "env"
            env_wallets = ["treasury"]
            supported_chains = ["ethereum", "base"]

            [planner]
            plan_ttl_secs = 600
            "#,
        )
        .unwrap();
        assert_eq!(config.signer.kind, SignerKind::Env);
        assert_eq!(config.signer.supported_chains, vec![Chain::Ethereum, Chain::Base]);
        assert_eq!(config.planner.plan_ttl_secs, 600);
        assert_eq!(config.planner.fee_gas_price_gwei, 20);
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_signer_kind_parsing() {
        assert_eq!("VAULT".parse::<SignerKind>().unwrap(), SignerKind::Vault);
        assert!("hsm".parse::<SignerKind>().is_err());
    }
}
