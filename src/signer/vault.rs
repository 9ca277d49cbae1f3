//! Vault-backed signer.
//!
//! The vault transport is not part of this build. A configured vault signer
//! reports `NotConfigured` from every operation so callers can tell a missing
//! integration apart from a signing failure.

use async_trait::async_trait;
use std::collections::HashSet;
use url::Url;

use crate::config::schema::SignerConfig;
use crate::signer::{Signer, SignerError, SignerKind, SignerResult};
use crate::tx::types::{BroadcastReceipt, Chain, PublicAddress, TxIntent, WalletId};

const TRANSPORT_UNAVAILABLE: &str = "vault transport is not available";

#[derive(Debug)]
pub struct VaultSigner {
    /// Host only; credentials embedded in the URL are not kept.
    host: String,
    chains: HashSet<Chain>,
}

impl VaultSigner {
    pub fn new(config: &SignerConfig) -> SignerResult<Self> {
        let raw = config
            .vault_url
            .as_deref()
            .ok_or_else(|| SignerError::NotConfigured("signer.vault_url is not set".into()))?;
        let url = Url::parse(raw)
            .map_err(|_| SignerError::NotConfigured("signer.vault_url is not a valid URL".into()))?;
        let host = url
            .host_str()
            .ok_or_else(|| SignerError::NotConfigured("signer.vault_url has no host".into()))?
            .to_string();

        tracing::warn!(host = %host, "Vault signer selected; vault transport is unavailable");

        Ok(Self {
            host,
            chains: config.supported_chains.iter().copied().collect(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn unavailable<T>(&self) -> SignerResult<T> {
        Err(SignerError::NotConfigured(TRANSPORT_UNAVAILABLE.into()))
    }
}

#[async_trait]
impl Signer for VaultSigner {
    async fn get_public_address(&self, _wallet_id: &WalletId) -> SignerResult<PublicAddress> {
        self.unavailable()
    }

    async fn sign_and_broadcast(&self, _intent: &TxIntent) -> SignerResult<BroadcastReceipt> {
        self.unavailable()
    }

    async fn estimate_gas(&self, _intent: &TxIntent) -> SignerResult<String> {
        Err(SignerError::EstimationUnavailable(TRANSPORT_UNAVAILABLE.into()))
    }

    fn supported_chains(&self) -> HashSet<Chain> {
        self.chains.clone()
    }

    fn kind(&self) -> SignerKind {
        SignerKind::Vault
    }
}
