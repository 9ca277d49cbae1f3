//! Transfer planning and execution core.
//!
//! # Data Flow
//! ```text
//! TxIntent (from an agent)
//!     → planner.rs (validate, resolve address, estimate gas)
//!     → TxPlan { status: pending }  stored in PlanRepository
//!     → caller reviews
//!     → executor.rs (validate, CAS to executing, sign_and_broadcast)
//!     → TxReceipt stored in ReceiptRepository, plan completed | failed
//! ```
//!
//! # Security Constraints
//! - Nothing in this module can hold a key; wallets are ids and addresses
//! - The executor is the only caller of `Signer::sign_and_broadcast`
//! - Errors crossing the boundary carry sanitized messages only

pub mod amount;
pub mod error;
pub mod executor;
pub mod planner;
pub mod types;

pub use error::{WalletError, WalletResult};
pub use executor::TxExecutor;
pub use planner::{validate_plan_for_execution, TxPlanner};
pub use types::{
    Asset, BroadcastReceipt, Chain, PlanId, PlanStatus, PublicAddress, Rail, ReceiptStatus,
    TxIntent, TxPlan, TxReceipt, TxStatusView, WalletId,
};
