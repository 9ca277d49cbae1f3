//! Value model for transfer planning.
//!
//! None of these types can hold key material. Wallets are referenced by
//! [`WalletId`] and [`PublicAddress`] only; the signer backends are the only
//! place a secret is ever resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier naming a wallet binding. Safe to log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(String);

impl WalletId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Chain-specific public address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicAddress(String);

impl PublicAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PublicAddress {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

/// Fungible unit being transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

impl Asset {
    /// Native asset of a chain (no token contract).
    pub fn native(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            contract_address: None,
        }
    }

    pub fn is_native(&self) -> bool {
        self.contract_address.is_none()
    }
}

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
    Solana,
}

impl Chain {
    pub const ALL: [Chain; 6] = [
        Chain::Ethereum,
        Chain::Polygon,
        Chain::Arbitrum,
        Chain::Optimism,
        Chain::Base,
        Chain::Solana,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Arbitrum => "arbitrum",
            Chain::Optimism => "optimism",
            Chain::Base => "base",
            Chain::Solana => "solana",
        }
    }

    /// Whether the chain uses EVM accounts and secp256k1 keys.
    pub fn is_evm(&self) -> bool {
        !matches!(self, Chain::Solana)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized chain name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized chain: {0}")]
pub struct UnknownChain(pub String);

impl FromStr for Chain {
    type Err = UnknownChain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::ALL
            .into_iter()
            .find(|chain| chain.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChain(s.to_string()))
    }
}

/// How value moves between the source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rail {
    Native,
    Bridge,
    CrossChainSwap,
}

/// Unsigned transfer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxIntent {
    pub from_wallet_id: WalletId,
    pub to_address: String,
    /// Decimal string in display units (e.g. "1.5" ETH).
    pub amount: String,
    pub asset: Asset,
    pub chain: Chain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rail: Option<Rail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Unique plan identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub Uuid);

impl PlanId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlanId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Plan lifecycle.
///
/// ```text
/// pending   → executing   (executor, atomic compare-and-set)
/// pending   → expired     (expiry sweep)
/// executing → completed   (signer ok)
/// executing → failed      (signer error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Pending,
    Executing,
    Completed,
    Failed,
    Expired,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::Executing => "executing",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
            PlanStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlanStatus::Completed | PlanStatus::Failed | PlanStatus::Expired
        )
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A previewable, time-bounded proposal to execute a [`TxIntent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxPlan {
    pub plan_id: PlanId,
    pub intent: TxIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_fee: Option<String>,
    pub from_address: PublicAddress,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: PlanStatus,
}

impl TxPlan {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// On-chain state of a broadcast transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Pending,
    Confirmed,
    Failed,
}

/// What a signer reports after broadcasting. Becomes a [`TxReceipt`] once the
/// executor attaches the plan it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastReceipt {
    pub tx_hash: String,
    pub chain: Chain,
    pub status: ReceiptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u32>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_fee: Option<String>,
}

impl BroadcastReceipt {
    pub fn into_receipt(self, plan_id: PlanId) -> TxReceipt {
        TxReceipt {
            plan_id,
            tx_hash: self.tx_hash,
            chain: self.chain,
            status: self.status,
            block_number: self.block_number,
            confirmations: self.confirmations,
            timestamp: self.timestamp,
            gas_used: self.gas_used,
            effective_fee: self.effective_fee,
        }
    }
}

/// Immutable record of an executed plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub plan_id: PlanId,
    pub tx_hash: String,
    pub chain: Chain,
    pub status: ReceiptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u32>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_fee: Option<String>,
}

/// Current state of a plan plus its receipt, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxStatusView {
    pub plan_status: PlanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TxReceipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_parsing() {
        assert_eq!("ethereum".parse::<Chain>().unwrap(), Chain::Ethereum);
        assert_eq!("Base".parse::<Chain>().unwrap(), Chain::Base);
        assert!("dogecoin".parse::<Chain>().is_err());
        assert!(!Chain::Solana.is_evm());
        assert!(Chain::Arbitrum.is_evm());
    }

    #[test]
    fn test_intent_json_shape() {
        let json = r#"{
            "fromWalletId": "treasury",
            "toAddress": "0xabc",
            "amount": "1.0",
            "asset": {"symbol": "ETH", "decimals": 18},
            "chain": "ethereum",
            "rail": "cross-chain-swap"
        }"#;
        let intent: TxIntent = serde_json::from_str(json).unwrap();
        assert_eq!(intent.from_wallet_id.as_str(), "treasury");
        assert_eq!(intent.rail, Some(Rail::CrossChainSwap));
        assert!(intent.asset.is_native());
        assert!(intent.memo.is_none());
    }

    #[test]
    fn test_plan_omits_missing_gas_fields() {
        let now = Utc::now();
        let plan = TxPlan {
            plan_id: PlanId::generate(),
            intent: TxIntent {
                from_wallet_id: "w".into(),
                to_address: "0xabc".into(),
                amount: "1".into(),
                asset: Asset::native("ETH", 18),
                chain: Chain::Ethereum,
                rail: None,
                memo: None,
            },
            estimated_gas: None,
            estimated_fee: None,
            from_address: "0x1".into(),
            created_at: now,
            expires_at: now,
            status: PlanStatus::Pending,
        };
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value.get("estimatedGas").is_none());
        assert_eq!(value["status"], "pending");
        assert_eq!(value["fromAddress"], "0x1");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!PlanStatus::Pending.is_terminal());
        assert!(!PlanStatus::Executing.is_terminal());
        assert!(PlanStatus::Completed.is_terminal());
        assert!(PlanStatus::Failed.is_terminal());
        assert!(PlanStatus::Expired.is_terminal());
    }
}
