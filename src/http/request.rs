//! Request bodies accepted by the API.
//!
//! Bodies are deserialized leniently (missing strings default to empty) so
//! that field problems are reported by planner validation, in order, rather
//! than by the JSON extractor.

use serde::Deserialize;

use crate::tx::planner::validate_transfer_fields;
use crate::tx::types::{Asset, Chain, PlanId, Rail, TxIntent, WalletId};
use crate::tx::{WalletError, WalletResult};

/// `POST /tx/plan` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanRequest {
    pub from_wallet_id: String,
    pub to_address: String,
    pub amount: String,
    pub asset: Option<Asset>,
    pub chain: Option<String>,
    pub rail: Option<Rail>,
    pub memo: Option<String>,
}

impl PlanRequest {
    /// Validate and convert into a typed intent. Checks run in the planner's
    /// order; an unrecognized chain reads as a missing field.
    pub fn into_intent(self) -> WalletResult<TxIntent> {
        validate_transfer_fields(&self.from_wallet_id, &self.to_address, &self.amount)?;

        let chain = self
            .chain
            .as_deref()
            .and_then(|c| c.parse::<Chain>().ok())
            .ok_or(WalletError::MissingField("chain"))?;
        let asset = self.asset.ok_or(WalletError::MissingField("asset"))?;

        Ok(TxIntent {
            from_wallet_id: WalletId::new(self.from_wallet_id),
            to_address: self.to_address,
            amount: self.amount,
            asset,
            chain,
            rail: self.rail,
            memo: self.memo,
        })
    }
}

/// `POST /tx/execute` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub plan_id: String,
}

impl ExecuteRequest {
    pub fn plan_id(&self) -> Option<PlanId> {
        self.plan_id.parse().ok()
    }
}
