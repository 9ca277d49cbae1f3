//! Signing boundary.
//!
//! # Data Flow
//! ```text
//! config [signer] kind = mock | env | vault
//!     → SignerBackend::from_config (selected once at startup)
//!     → planner: get_public_address, estimate_gas, supported_chains
//!     → executor: sign_and_broadcast (the only call that may touch a secret)
//! ```
//!
//! # Security Constraints
//! - Secrets are resolved inside the backend and never returned
//! - Errors carry sanitized messages only; backends rewrap underlying errors
//! - Debug output of a signer lists wallet ids and addresses, never keys
//! - Intents are validated before any secret is used

pub mod env;
pub mod mock;
pub mod vault;

use alloy::primitives::{keccak256, B256};
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::SignerConfig;
use crate::tx::amount::is_positive_decimal;
use crate::tx::types::{BroadcastReceipt, Chain, PublicAddress, TxIntent, WalletId};

pub use crate::config::schema::SignerKind;
pub use env::{Broadcaster, EnvSigner, SignedTransfer};
pub use mock::MockSigner;
pub use vault::VaultSigner;

/// Errors a signer may raise. Messages must never contain secret material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("Unknown wallet: {0}")]
    UnknownWallet(WalletId),

    #[error("Chain {0} is not supported by this signer")]
    UnsupportedChain(Chain),

    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("Gas estimation unavailable: {0}")]
    EstimationUnavailable(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// The backend has no secrets or transport wired up in this deployment.
    #[error("Signer not configured: {0}")]
    NotConfigured(String),
}

pub type SignerResult<T> = Result<T, SignerError>;

/// Capability interface over signing backends.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Public address bound to `wallet_id`.
    async fn get_public_address(&self, wallet_id: &WalletId) -> SignerResult<PublicAddress>;

    /// Sign and broadcast the transfer. The only operation allowed to use a secret.
    async fn sign_and_broadcast(&self, intent: &TxIntent) -> SignerResult<BroadcastReceipt>;

    /// Best-effort gas estimate; callers must tolerate failure.
    async fn estimate_gas(&self, intent: &TxIntent) -> SignerResult<String>;

    fn supported_chains(&self) -> HashSet<Chain>;

    fn kind(&self) -> SignerKind;
}

/// The closed set of signer backends, selected once from configuration.
#[derive(Debug)]
pub enum SignerBackend {
    Mock(MockSigner),
    Env(EnvSigner),
    Vault(VaultSigner),
}

impl SignerBackend {
    pub fn from_config(config: &SignerConfig) -> SignerResult<Self> {
        let backend = match config.kind {
            SignerKind::Mock => SignerBackend::Mock(MockSigner::from_config(config)),
            SignerKind::Env => SignerBackend::Env(EnvSigner::from_env(config)?),
            SignerKind::Vault => SignerBackend::Vault(VaultSigner::new(config)?),
        };

        tracing::info!(
            kind = %config.kind,
            chains = backend.supported_chains().len(),
            "Signer backend initialized"
        );
        Ok(backend)
    }

    fn inner(&self) -> &dyn Signer {
        match self {
            SignerBackend::Mock(s) => s,
            SignerBackend::Env(s) => s,
            SignerBackend::Vault(s) => s,
        }
    }
}

#[async_trait]
impl Signer for SignerBackend {
    async fn get_public_address(&self, wallet_id: &WalletId) -> SignerResult<PublicAddress> {
        self.inner().get_public_address(wallet_id).await
    }

    async fn sign_and_broadcast(&self, intent: &TxIntent) -> SignerResult<BroadcastReceipt> {
        self.inner().sign_and_broadcast(intent).await
    }

    async fn estimate_gas(&self, intent: &TxIntent) -> SignerResult<String> {
        self.inner().estimate_gas(intent).await
    }

    fn supported_chains(&self) -> HashSet<Chain> {
        self.inner().supported_chains()
    }

    fn kind(&self) -> SignerKind {
        self.inner().kind()
    }
}

/// Intrinsic gas for a plain value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Typical gas for an ERC-20 style token transfer.
pub const TOKEN_TRANSFER_GAS: u64 = 65_000;

/// Static gas estimate by asset kind.
pub(crate) fn intrinsic_gas(intent: &TxIntent) -> u64 {
    if intent.asset.is_native() {
        NATIVE_TRANSFER_GAS
    } else {
        TOKEN_TRANSFER_GAS
    }
}

/// Checks every backend runs before resolving a secret.
pub(crate) fn check_intent(intent: &TxIntent, chains: &HashSet<Chain>) -> SignerResult<()> {
    if intent.from_wallet_id.is_empty() {
        return Err(SignerError::InvalidIntent("fromWalletId is empty".into()));
    }
    if intent.to_address.trim().is_empty() {
        return Err(SignerError::InvalidIntent("toAddress is empty".into()));
    }
    if !is_positive_decimal(&intent.amount) {
        return Err(SignerError::InvalidIntent(format!(
            "amount {:?} is not a positive decimal",
            intent.amount
        )));
    }
    if !chains.contains(&intent.chain) {
        return Err(SignerError::UnsupportedChain(intent.chain));
    }
    Ok(())
}

/// Keccak-256 over a canonical, field-delimited encoding of the intent.
pub(crate) fn intent_digest(intent: &TxIntent, from: &PublicAddress, salt: u64) -> B256 {
    let mut data = Vec::new();
    for field in [
        intent.chain.as_str(),
        from.as_str(),
        intent.to_address.as_str(),
        intent.amount.as_str(),
        intent.asset.symbol.as_str(),
        intent.asset.contract_address.as_deref().unwrap_or(""),
        intent.memo.as_deref().unwrap_or(""),
    ] {
        data.extend_from_slice(&(field.len() as u64).to_be_bytes());
        data.extend_from_slice(field.as_bytes());
    }
    data.push(intent.asset.decimals);
    data.extend_from_slice(&salt.to_be_bytes());
    keccak256(&data)
}
