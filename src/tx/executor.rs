//! Plan execution: the signing boundary.
//!
//! # State Machine
//! ```text
//! pending   --(validate ok, CAS)--> executing
//! executing --(signer ok)---------> completed   (receipt stored first)
//! executing --(signer error)------> failed      (terminal, never retried)
//! ```
//!
//! # Guarantees
//! - `executing` is written before the signer is called, and only one caller
//!   can win the `pending → executing` compare-and-set for a plan
//! - `completed` / `failed` are written only after the signer returns, even
//!   if the caller stops waiting
//! - Errors returned to callers carry the signer's sanitized message only

use chrono::Utc;
use std::sync::Arc;

use crate::observability::metrics;
use crate::signer::Signer;
use crate::store::{PlanRepository, ReceiptRepository};
use crate::tx::error::{WalletError, WalletResult};
use crate::tx::planner::validate_plan_for_execution;
use crate::tx::types::{PlanId, PlanStatus, TxPlan, TxReceipt, TxStatusView};

#[derive(Clone)]
pub struct TxExecutor {
    plans: Arc<dyn PlanRepository>,
    receipts: Arc<dyn ReceiptRepository>,
}

impl TxExecutor {
    pub fn new(plans: Arc<dyn PlanRepository>, receipts: Arc<dyn ReceiptRepository>) -> Self {
        Self { plans, receipts }
    }

    /// Execute a pending plan exactly once.
    ///
    /// Once the plan is claimed, signing and bookkeeping run on a spawned
    /// task, so dropping the returned future (request timeout, client
    /// disconnect) does not strand the plan in `executing`.
    pub async fn execute_transfer<S>(&self, plan_id: &PlanId, signer: Arc<S>) -> WalletResult<TxReceipt>
    where
        S: Signer + ?Sized + 'static,
    {
        let plan = self.claim(plan_id).inspect_err(|e| {
            tracing::info!(plan_id = %plan_id, reason = e.kind(), "Execution rejected");
            metrics::record_execution("rejected");
        })?;

        tracing::info!(
            plan_id = %plan_id,
            wallet_id = %plan.intent.from_wallet_id,
            chain = %plan.intent.chain,
            "Executing plan"
        );

        let executor = self.clone();
        let task = tokio::spawn(async move { executor.dispatch(plan, signer.as_ref()).await });
        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(plan_id = %plan_id, error = %e, "Execution task aborted");
                metrics::record_execution("aborted");
                Err(WalletError::ExecutionFailed("execution task aborted".to_string()))
            }
        }
    }

    /// Sign a claimed plan and write its terminal state.
    async fn dispatch<S>(&self, plan: TxPlan, signer: &S) -> WalletResult<TxReceipt>
    where
        S: Signer + ?Sized,
    {
        let plan_id = plan.plan_id;
        match signer.sign_and_broadcast(&plan.intent).await {
            Ok(broadcast) => {
                let receipt = broadcast.into_receipt(plan_id);
                if let Err(e) = self.record(&receipt) {
                    tracing::error!(
                        plan_id = %plan_id,
                        tx_hash = %receipt.tx_hash,
                        chain = %receipt.chain,
                        error = %e,
                        "Broadcast succeeded but receipt was not recorded"
                    );
                    metrics::record_execution("unrecorded");
                    return Err(e);
                }

                tracing::info!(
                    plan_id = %plan_id,
                    tx_hash = %receipt.tx_hash,
                    chain = %receipt.chain,
                    "Plan completed"
                );
                metrics::record_execution("completed");
                Ok(receipt)
            }
            Err(e) => {
                // Display output of signer errors is sanitized by contract.
                let message = e.to_string();
                if let Err(store_err) =
                    self.plans
                        .transition(&plan_id, PlanStatus::Executing, PlanStatus::Failed)
                {
                    tracing::error!(plan_id = %plan_id, error = %store_err, "Failed to mark plan failed");
                }

                tracing::warn!(plan_id = %plan_id, error = %message, "Plan execution failed");
                metrics::record_execution("failed");
                Err(WalletError::ExecutionFailed(message))
            }
        }
    }

    /// Store the receipt, then complete the plan.
    fn record(&self, receipt: &TxReceipt) -> WalletResult<()> {
        self.receipts.put_if_absent(receipt.clone())?;
        self.plans
            .transition(&receipt.plan_id, PlanStatus::Executing, PlanStatus::Completed)?;
        Ok(())
    }

    /// Validate and atomically move the plan to `executing`.
    fn claim(&self, plan_id: &PlanId) -> WalletResult<TxPlan> {
        let plan = self
            .plans
            .get(plan_id)
            .ok_or(WalletError::NotFound(*plan_id))?;
        validate_plan_for_execution(&plan, Utc::now())?;

        // The status may have changed since the read above; the CAS decides.
        let plan = self
            .plans
            .transition(plan_id, PlanStatus::Pending, PlanStatus::Executing)?;
        Ok(plan)
    }

    pub fn get_tx_receipt(&self, plan_id: &PlanId) -> Option<TxReceipt> {
        self.receipts.get(plan_id)
    }

    pub fn get_tx_status(&self, plan_id: &PlanId) -> WalletResult<TxStatusView> {
        let plan = self
            .plans
            .get(plan_id)
            .ok_or(WalletError::NotFound(*plan_id))?;
        Ok(TxStatusView {
            plan_status: plan.status,
            receipt: self.receipts.get(plan_id),
        })
    }
}
