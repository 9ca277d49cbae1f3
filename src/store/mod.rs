//! Plan and receipt repositories.
//!
//! # Data Flow
//! ```text
//! TxPlanner  ── put / scan / transition ──▶ PlanRepository
//! TxExecutor ── get / transition ─────────▶ PlanRepository
//!            ── put_if_absent ────────────▶ ReceiptRepository
//! ```
//!
//! # Concurrency
//! - Every write is exclusive per plan id; distinct plans never contend
//! - `transition` is the only way to move a plan between statuses and checks
//!   the expected status under the same entry lock it writes with
//! - Receipts are write-once

pub mod file;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::config::schema::StoreConfig;
use crate::tx::types::{PlanId, PlanStatus, TxPlan, TxReceipt};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Compare-and-set lost: the plan was not in the expected status.
    #[error("Plan {plan_id} is {actual}, expected {expected}")]
    StatusMismatch {
        plan_id: PlanId,
        expected: PlanStatus,
        actual: PlanStatus,
    },

    #[error("Receipt already recorded for plan {0}")]
    DuplicateReceipt(PlanId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed storage of plans.
pub trait PlanRepository: Send + Sync {
    fn get(&self, plan_id: &PlanId) -> Option<TxPlan>;

    /// Insert or replace a plan.
    fn put(&self, plan: TxPlan);

    /// Snapshot of every stored plan.
    fn scan(&self) -> Vec<TxPlan>;

    /// Atomically move a plan from `from` to `to`, returning the updated plan.
    fn transition(&self, plan_id: &PlanId, from: PlanStatus, to: PlanStatus)
        -> StoreResult<TxPlan>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed, write-once storage of receipts.
pub trait ReceiptRepository: Send + Sync {
    fn get(&self, plan_id: &PlanId) -> Option<TxReceipt>;

    /// Record a receipt; fails with [`StoreError::DuplicateReceipt`] if the
    /// plan already has one.
    fn put_if_absent(&self, receipt: TxReceipt) -> StoreResult<()>;

    fn len(&self) -> usize;
}

/// Repositories selected from configuration.
#[derive(Clone)]
pub struct Stores {
    pub plans: Arc<dyn PlanRepository>,
    pub receipts: Arc<dyn ReceiptRepository>,
    file: Option<Arc<FileStore>>,
}

impl Stores {
    /// In-memory stores only.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            plans: Arc::new(store.clone()),
            receipts: Arc::new(store),
            file: None,
        }
    }

    /// Open the stores described by `config`, loading any existing snapshot.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        match &config.persistence_path {
            Some(path) => {
                let file = Arc::new(FileStore::open(PathBuf::from(path))?);
                Ok(Self {
                    plans: file.clone(),
                    receipts: file.clone(),
                    file: Some(file),
                })
            }
            None => Ok(Self::in_memory()),
        }
    }

    /// Persist to disk when backed by a file; no-op otherwise.
    pub fn flush(&self) -> StoreResult<()> {
        match &self.file {
            Some(file) => file.save(),
            None => Ok(()),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }
}
