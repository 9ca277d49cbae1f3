//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use agent_wallet::config::{PlannerConfig, ServerConfig};
use agent_wallet::http::{build_router, AppState};
use agent_wallet::signer::MockSigner;
use agent_wallet::store::Stores;
use agent_wallet::tx::types::{Asset, Chain, TxIntent, WalletId};
use agent_wallet::tx::{TxExecutor, TxPlanner};
use axum::Router;

pub const DEMO_WALLET: &str = "demo-wallet";
pub const DEMO_ADDRESS: &str = "0x1234567890123456789012345678901234567890";
pub const RECIPIENT: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";

/// Planner, executor and mock signer over shared in-memory stores.
pub struct Harness {
    pub stores: Stores,
    pub planner: TxPlanner,
    pub executor: TxExecutor,
    pub signer: Arc<MockSigner>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_signer(MockSigner::new().with_wallet(DEMO_WALLET, DEMO_ADDRESS))
    }

    pub fn with_signer(signer: MockSigner) -> Self {
        Self::with_config(signer, PlannerConfig::default())
    }

    pub fn with_config(signer: MockSigner, config: PlannerConfig) -> Self {
        let stores = Stores::in_memory();
        Self {
            planner: TxPlanner::new(stores.plans.clone(), config),
            executor: TxExecutor::new(stores.plans.clone(), stores.receipts.clone()),
            signer: Arc::new(signer),
            stores,
        }
    }

    /// HTTP router over this harness's components.
    pub fn router(&self) -> Router {
        let state = AppState {
            planner: self.planner.clone(),
            executor: self.executor.clone(),
            signer: self.signer.clone(),
        };
        build_router(&ServerConfig::default(), state)
    }
}

/// Native ETH transfer from the demo wallet.
pub fn eth_intent(amount: &str) -> TxIntent {
    TxIntent {
        from_wallet_id: WalletId::new(DEMO_WALLET),
        to_address: RECIPIENT.to_string(),
        amount: amount.to_string(),
        asset: Asset::native("ETH", 18),
        chain: Chain::Ethereum,
        rail: None,
        memo: None,
    }
}
