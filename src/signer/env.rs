//! Environment-secret signer.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables, one per wallet
//! - Keys never leave this module: not logged, not serialized, not in errors
//! - Only EVM chains are supported (secp256k1 keys)
//! - Broadcasting is delegated to a [`Broadcaster`], which only ever sees the
//!   signature and public transfer fields

use alloy::primitives::{hex, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer as _;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::schema::SignerConfig;
use crate::signer::{
    check_intent, intent_digest, intrinsic_gas, Signer, SignerError, SignerKind, SignerResult,
};
use crate::tx::types::{Asset, BroadcastReceipt, Chain, PublicAddress, TxIntent, WalletId};

/// A signed transfer ready for submission. Contains no secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer {
    pub chain: Chain,
    pub from: PublicAddress,
    pub to: String,
    pub amount: String,
    pub asset: Asset,
    /// Keccak-256 digest that was signed.
    pub digest: B256,
    /// 65-byte `r || s || v` signature, 0x-prefixed hex.
    pub signature: String,
}

/// Submits signed transfers to a network.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, transfer: SignedTransfer) -> SignerResult<BroadcastReceipt>;
}

/// Env var holding the key for `wallet_id`: prefix plus the id uppercased,
/// with every non-alphanumeric character replaced by `_`.
pub fn key_env_var(prefix: &str, wallet_id: &WalletId) -> String {
    let suffix: String = wallet_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", prefix, suffix)
}

pub struct EnvSigner {
    keys: HashMap<WalletId, PrivateKeySigner>,
    chains: HashSet<Chain>,
    broadcaster: Option<Arc<dyn Broadcaster>>,
    nonce: AtomicU64,
}

impl EnvSigner {
    /// Load a key for every wallet in `config.env_wallets`.
    pub fn from_env(config: &SignerConfig) -> SignerResult<Self> {
        let mut keys = Vec::with_capacity(config.env_wallets.len());
        for wallet in &config.env_wallets {
            let wallet_id = WalletId::new(wallet.as_str());
            let var = key_env_var(&config.key_env_prefix, &wallet_id);
            let key = std::env::var(&var).map_err(|_| {
                SignerError::NotConfigured(format!("environment variable {} not set", var))
            })?;
            keys.push((wallet_id, key));
        }

        let chains = config.supported_chains.iter().copied();
        Self::from_private_keys(keys, chains)
    }

    /// Build from `(wallet id, hex private key)` pairs.
    pub fn from_private_keys<K>(
        keys: impl IntoIterator<Item = (WalletId, K)>,
        chains: impl IntoIterator<Item = Chain>,
    ) -> SignerResult<Self>
    where
        K: AsRef<str>,
    {
        let mut loaded = HashMap::new();
        for (wallet_id, key) in keys {
            let key = key.as_ref();
            let key_hex = key.strip_prefix("0x").unwrap_or(key);
            // The parse error can echo input, so it is dropped.
            let signer: PrivateKeySigner = key_hex.parse().map_err(|_| {
                SignerError::NotConfigured(format!("invalid private key for wallet {}", wallet_id))
            })?;

            tracing::info!(
                wallet_id = %wallet_id,
                address = %signer.address(),
                "Wallet key loaded"
            );
            loaded.insert(wallet_id, signer);
        }

        Ok(Self {
            keys: loaded,
            chains: chains.into_iter().filter(Chain::is_evm).collect(),
            broadcaster: None,
            nonce: AtomicU64::new(0),
        })
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    fn key(&self, wallet_id: &WalletId) -> SignerResult<&PrivateKeySigner> {
        self.keys
            .get(wallet_id)
            .ok_or_else(|| SignerError::UnknownWallet(wallet_id.clone()))
    }
}

impl fmt::Debug for EnvSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wallets: Vec<(&str, String)> = self
            .keys
            .iter()
            .map(|(id, key)| (id.as_str(), key.address().to_string()))
            .collect();
        f.debug_struct("EnvSigner")
            .field("wallets", &wallets)
            .field("chains", &self.chains)
            .field("broadcaster", &self.broadcaster.is_some())
            .finish()
    }
}

#[async_trait]
impl Signer for EnvSigner {
    async fn get_public_address(&self, wallet_id: &WalletId) -> SignerResult<PublicAddress> {
        let key = self.key(wallet_id)?;
        Ok(PublicAddress::new(key.address().to_string()))
    }

    async fn sign_and_broadcast(&self, intent: &TxIntent) -> SignerResult<BroadcastReceipt> {
        check_intent(intent, &self.chains)?;
        let key = self.key(&intent.from_wallet_id)?;
        let broadcaster = self.broadcaster.as_ref().ok_or_else(|| {
            SignerError::NotConfigured("no broadcaster configured for env signer".into())
        })?;

        let from = PublicAddress::new(key.address().to_string());
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let digest = intent_digest(intent, &from, nonce);

        let signature = key.sign_hash(&digest).await.map_err(|_| {
            tracing::warn!(wallet_id = %intent.from_wallet_id, "Signing digest failed");
            SignerError::SigningFailed(format!(
                "could not sign transfer for wallet {}",
                intent.from_wallet_id
            ))
        })?;

        let transfer = SignedTransfer {
            chain: intent.chain,
            from,
            to: intent.to_address.clone(),
            amount: intent.amount.clone(),
            asset: intent.asset.clone(),
            digest,
            signature: hex::encode_prefixed(signature.as_bytes()),
        };

        tracing::info!(
            wallet_id = %intent.from_wallet_id,
            chain = %intent.chain,
            digest = %digest,
            "Transfer signed, broadcasting"
        );
        broadcaster.broadcast(transfer).await
    }

    async fn estimate_gas(&self, intent: &TxIntent) -> SignerResult<String> {
        if !self.chains.contains(&intent.chain) {
            return Err(SignerError::EstimationUnavailable(format!(
                "no estimator for chain {}",
                intent.chain
            )));
        }
        Ok(intrinsic_gas(intent).to_string())
    }

    fn supported_chains(&self) -> HashSet<Chain> {
        self.chains.clone()
    }

    fn kind(&self) -> SignerKind {
        SignerKind::Env
    }
}
