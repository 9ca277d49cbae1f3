//! Errors surfaced by the planner and executor.
//!
//! Every message here crosses the signing boundary, so variants only carry
//! identifiers, statuses and messages that signers have already sanitized.

use thiserror::Error;

use crate::signer::SignerError;
use crate::store::StoreError;
use crate::tx::types::{Chain, PlanId, PlanStatus, WalletId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// A required intent field is empty or unrecognized.
    #[error("Missing or invalid field: {0}")]
    MissingField(&'static str),

    /// Amount is not a strictly positive decimal.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The configured signer cannot operate on this chain.
    #[error("Chain {0} is not supported by the configured signer")]
    UnsupportedChain(Chain),

    /// No wallet binding exists for the id.
    #[error("Unknown wallet: {0}")]
    UnknownWallet(WalletId),

    /// Gas estimation failed (only surfaced when estimates are required).
    #[error("Gas estimation unavailable: {0}")]
    EstimationUnavailable(String),

    #[error("Plan not found: {0}")]
    NotFound(PlanId),

    #[error("Plan {plan_id} is not pending (status: {status})")]
    NotPending { plan_id: PlanId, status: PlanStatus },

    #[error("Plan {0} has expired")]
    Expired(PlanId),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Broadcast failed; the plan is marked failed and is not retried.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The signer backend has no secrets wired up, or a setting is unusable.
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Storage error: {0}")]
    Store(String),
}

impl WalletError {
    /// Stable machine-readable kind, used in API error bodies and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            WalletError::MissingField(_) => "MissingField",
            WalletError::InvalidAmount(_) => "InvalidAmount",
            WalletError::UnsupportedChain(_) => "UnsupportedChain",
            WalletError::UnknownWallet(_) => "UnknownWallet",
            WalletError::EstimationUnavailable(_) => "EstimationUnavailable",
            WalletError::NotFound(_) => "NotFound",
            WalletError::NotPending { .. } => "NotPending",
            WalletError::Expired(_) => "Expired",
            WalletError::SigningFailed(_) => "SigningFailed",
            WalletError::ExecutionFailed(_) => "ExecutionFailed",
            WalletError::NotConfigured(_) => "NotConfigured",
            WalletError::Store(_) => "Store",
        }
    }

    /// Errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WalletError::MissingField(_)
                | WalletError::InvalidAmount(_)
                | WalletError::UnsupportedChain(_)
                | WalletError::UnknownWallet(_)
        )
    }
}

impl From<SignerError> for WalletError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::UnknownWallet(id) => WalletError::UnknownWallet(id),
            SignerError::UnsupportedChain(chain) => WalletError::UnsupportedChain(chain),
            SignerError::InvalidIntent(msg) => WalletError::InvalidAmount(msg),
            SignerError::EstimationUnavailable(msg) => WalletError::EstimationUnavailable(msg),
            SignerError::SigningFailed(msg) => WalletError::SigningFailed(msg),
            SignerError::NotConfigured(msg) => WalletError::NotConfigured(msg),
        }
    }
}

impl From<StoreError> for WalletError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PlanNotFound(id) => WalletError::NotFound(id),
            StoreError::StatusMismatch {
                plan_id,
                actual: PlanStatus::Expired,
                ..
            } => WalletError::Expired(plan_id),
            StoreError::StatusMismatch {
                plan_id, actual, ..
            } => WalletError::NotPending {
                plan_id,
                status: actual,
            },
            other => WalletError::Store(other.to_string()),
        }
    }
}

/// Result type for planner and executor operations.
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(WalletError::MissingField("toAddress").kind(), "MissingField");
        assert!(WalletError::InvalidAmount("0".into()).is_client_error());
        assert!(!WalletError::NotFound(PlanId::generate()).is_client_error());
    }

    #[test]
    fn test_lost_race_to_sweeper_reads_as_expired() {
        let plan_id = PlanId::generate();
        let err: WalletError = StoreError::StatusMismatch {
            plan_id,
            expected: PlanStatus::Pending,
            actual: PlanStatus::Expired,
        }
        .into();
        assert_eq!(err, WalletError::Expired(plan_id));

        let err: WalletError = StoreError::StatusMismatch {
            plan_id,
            expected: PlanStatus::Pending,
            actual: PlanStatus::Executing,
        }
        .into();
        assert_eq!(err.kind(), "NotPending");
    }

    #[test]
    fn test_signer_error_mapping() {
        let err: WalletError = SignerError::NotConfigured("vault transport".into()).into();
        assert_eq!(err.kind(), "NotConfigured");
        let err: WalletError = SignerError::UnknownWallet("ghost".into()).into();
        assert_eq!(err, WalletError::UnknownWallet("ghost".into()));
    }
}
