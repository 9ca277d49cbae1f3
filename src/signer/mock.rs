//! Deterministic in-memory signer for development and tests.
//!
//! Holds a fixed wallet → address table and fabricates receipts without
//! touching any key material.

use alloy::primitives::hex;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::config::schema::SignerConfig;
use crate::signer::{
    check_intent, intent_digest, intrinsic_gas, Signer, SignerError, SignerKind, SignerResult,
};
use crate::tx::types::{BroadcastReceipt, Chain, PublicAddress, ReceiptStatus, TxIntent, WalletId};

/// First block number reported by mock receipts.
const MOCK_GENESIS_BLOCK: u64 = 1_000_000;

#[derive(Debug)]
pub struct MockSigner {
    wallets: HashMap<WalletId, PublicAddress>,
    chains: HashSet<Chain>,
    broadcast_delay: Option<Duration>,
    fail_broadcast: AtomicBool,
    fail_estimate: AtomicBool,
    /// Successful and failed broadcast attempts.
    broadcasts: AtomicU64,
}

impl MockSigner {
    /// Empty signer supporting every chain.
    pub fn new() -> Self {
        Self {
            wallets: HashMap::new(),
            chains: Chain::ALL.into_iter().collect(),
            broadcast_delay: None,
            fail_broadcast: AtomicBool::new(false),
            fail_estimate: AtomicBool::new(false),
            broadcasts: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &SignerConfig) -> Self {
        let mut signer = Self::new().with_chains(config.supported_chains.iter().copied());
        for binding in &config.mock_wallets {
            signer = signer.with_wallet(binding.wallet_id.as_str(), binding.address.as_str());
        }
        signer
    }

    /// Bind a wallet id to an address.
    pub fn with_wallet(mut self, wallet_id: &str, address: &str) -> Self {
        self.wallets
            .insert(WalletId::new(wallet_id), PublicAddress::new(address));
        self
    }

    pub fn with_chains(mut self, chains: impl IntoIterator<Item = Chain>) -> Self {
        self.chains = chains.into_iter().collect();
        self
    }

    /// Sleep inside every broadcast, to widen race windows in tests.
    pub fn with_broadcast_delay(mut self, delay: Duration) -> Self {
        self.broadcast_delay = Some(delay);
        self
    }

    /// Make subsequent broadcasts fail with `SigningFailed`.
    pub fn set_fail_broadcast(&self, fail: bool) {
        self.fail_broadcast.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent gas estimates fail with `EstimationUnavailable`.
    pub fn set_fail_estimate(&self, fail: bool) {
        self.fail_estimate.store(fail, Ordering::SeqCst);
    }

    /// Number of times `sign_and_broadcast` reached the broadcast step.
    pub fn broadcast_count(&self) -> u64 {
        self.broadcasts.load(Ordering::SeqCst)
    }

    fn lookup(&self, wallet_id: &WalletId) -> SignerResult<&PublicAddress> {
        self.wallets
            .get(wallet_id)
            .ok_or_else(|| SignerError::UnknownWallet(wallet_id.clone()))
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Signer for MockSigner {
    async fn get_public_address(&self, wallet_id: &WalletId) -> SignerResult<PublicAddress> {
        self.lookup(wallet_id).cloned()
    }

    async fn sign_and_broadcast(&self, intent: &TxIntent) -> SignerResult<BroadcastReceipt> {
        check_intent(intent, &self.chains)?;
        let from = self.lookup(&intent.from_wallet_id)?.clone();

        let sequence = self.broadcasts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.broadcast_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_broadcast.load(Ordering::SeqCst) {
            tracing::debug!(wallet_id = %intent.from_wallet_id, "Mock broadcast rejected");
            return Err(SignerError::SigningFailed(
                "mock signer rejected the broadcast".into(),
            ));
        }

        let gas = intrinsic_gas(intent);
        Ok(BroadcastReceipt {
            tx_hash: hex::encode_prefixed(intent_digest(intent, &from, sequence)),
            chain: intent.chain,
            status: ReceiptStatus::Confirmed,
            block_number: Some(MOCK_GENESIS_BLOCK + sequence),
            confirmations: Some(1),
            timestamp: Utc::now(),
            gas_used: Some(gas.to_string()),
            effective_fee: None,
        })
    }

    async fn estimate_gas(&self, intent: &TxIntent) -> SignerResult<String> {
        if self.fail_estimate.load(Ordering::SeqCst) {
            return Err(SignerError::EstimationUnavailable(
                "mock estimator disabled".into(),
            ));
        }
        Ok(intrinsic_gas(intent).to_string())
    }

    fn supported_chains(&self) -> HashSet<Chain> {
        self.chains.clone()
    }

    fn kind(&self) -> SignerKind {
        SignerKind::Mock
    }
}
