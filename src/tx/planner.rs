//! Transfer planning: validate an intent and materialize a pending plan.
//!
//! # Responsibilities
//! - Validate intents (first violation wins)
//! - Resolve the source address through the signer
//! - Attach a best-effort gas and fee estimate
//! - Store the plan and expire stale pending plans on request

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

use crate::config::schema::PlannerConfig;
use crate::observability::metrics;
use crate::signer::Signer;
use crate::store::{PlanRepository, StoreError};
use crate::tx::amount::{format_units, validate_amount};
use crate::tx::error::{WalletError, WalletResult};
use crate::tx::types::{PlanId, PlanStatus, TxIntent, TxPlan};

const WEI_PER_GWEI: u128 = 1_000_000_000;
const NATIVE_FEE_DECIMALS: u32 = 18;

/// Validate the free-form transfer fields in order: source wallet,
/// destination, amount.
pub fn validate_transfer_fields(from_wallet_id: &str, to_address: &str, amount: &str) -> WalletResult<()> {
    if from_wallet_id.trim().is_empty() {
        return Err(WalletError::MissingField("fromWalletId"));
    }
    if to_address.trim().is_empty() {
        return Err(WalletError::MissingField("toAddress"));
    }
    validate_amount(amount)
}

/// Validate a typed intent. The chain is an enum here, so only the transfer
/// fields can fail.
pub fn validate_intent(intent: &TxIntent) -> WalletResult<()> {
    validate_transfer_fields(
        intent.from_wallet_id.as_str(),
        &intent.to_address,
        &intent.amount,
    )
}

/// Check a plan may be executed at `now`. A plan already swept to `expired`
/// reports the same error as one whose window has just lapsed.
pub fn validate_plan_for_execution(plan: &TxPlan, now: DateTime<Utc>) -> WalletResult<()> {
    if plan.status == PlanStatus::Expired {
        return Err(WalletError::Expired(plan.plan_id));
    }
    if plan.status != PlanStatus::Pending {
        return Err(WalletError::NotPending {
            plan_id: plan.plan_id,
            status: plan.status,
        });
    }
    if plan.is_expired(now) {
        return Err(WalletError::Expired(plan.plan_id));
    }
    Ok(())
}

/// Native-unit fee for `gas` at `gas_price_gwei`, or `None` if the estimate
/// is not an integer.
pub fn estimate_fee(gas: &str, gas_price_gwei: u64) -> Option<String> {
    let gas: u128 = gas.trim().parse().ok()?;
    let wei = gas
        .checked_mul(gas_price_gwei as u128)?
        .checked_mul(WEI_PER_GWEI)?;
    Some(format_units(wei, NATIVE_FEE_DECIMALS))
}

#[derive(Clone)]
pub struct TxPlanner {
    plans: Arc<dyn PlanRepository>,
    config: PlannerConfig,
}

impl TxPlanner {
    pub fn new(plans: Arc<dyn PlanRepository>, config: PlannerConfig) -> Self {
        Self { plans, config }
    }

    /// Plan lifetime, or `None` if the configured value does not fit.
    pub fn ttl(&self) -> Option<TimeDelta> {
        i64::try_from(self.config.plan_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> WalletResult<DateTime<Utc>> {
        self.ttl()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                WalletError::NotConfigured(format!(
                    "plan ttl of {}s is out of range",
                    self.config.plan_ttl_secs
                ))
            })
    }

    /// Validate `intent` and store a new pending plan for it.
    pub async fn plan_transfer<S>(&self, intent: TxIntent, signer: &S) -> WalletResult<TxPlan>
    where
        S: Signer + ?Sized,
    {
        validate_intent(&intent)?;
        if !signer.supported_chains().contains(&intent.chain) {
            return Err(WalletError::UnsupportedChain(intent.chain));
        }

        let from_address = signer.get_public_address(&intent.from_wallet_id).await?;

        let (estimated_gas, estimated_fee) = match signer.estimate_gas(&intent).await {
            Ok(gas) => {
                let fee = estimate_fee(&gas, self.config.fee_gas_price_gwei);
                (Some(gas), fee)
            }
            Err(e) if self.config.require_gas_estimate => {
                tracing::warn!(
                    wallet_id = %intent.from_wallet_id,
                    chain = %intent.chain,
                    error = %e,
                    "Gas estimate required but unavailable"
                );
                return Err(e.into());
            }
            Err(e) => {
                tracing::warn!(
                    wallet_id = %intent.from_wallet_id,
                    chain = %intent.chain,
                    error = %e,
                    "Gas estimation failed, planning without it"
                );
                (None, None)
            }
        };

        let now = Utc::now();
        let expires_at = self.expiry_from(now)?;
        let plan = TxPlan {
            plan_id: PlanId::generate(),
            intent,
            estimated_gas,
            estimated_fee,
            from_address,
            created_at: now,
            expires_at,
            status: PlanStatus::Pending,
        };
        self.plans.put(plan.clone());

        tracing::info!(
            plan_id = %plan.plan_id,
            wallet_id = %plan.intent.from_wallet_id,
            chain = %plan.intent.chain,
            expires_at = %plan.expires_at,
            "Transfer planned"
        );
        metrics::record_plan_created(plan.intent.chain);

        Ok(plan)
    }

    pub fn get_tx_plan(&self, plan_id: &PlanId) -> Option<TxPlan> {
        self.plans.get(plan_id)
    }

    /// Move every pending plan past its expiry to `expired`. Plans in any
    /// other status are left alone. Returns how many plans changed.
    pub fn cleanup_expired_plans(&self) -> usize {
        let now = Utc::now();
        let mut expired = 0;

        for plan in self.plans.scan() {
            if plan.status != PlanStatus::Pending || !plan.is_expired(now) {
                continue;
            }
            match self
                .plans
                .transition(&plan.plan_id, PlanStatus::Pending, PlanStatus::Expired)
            {
                Ok(_) => {
                    tracing::debug!(plan_id = %plan.plan_id, "Plan expired");
                    expired += 1;
                }
                // Picked up by an executor between scan and transition.
                Err(StoreError::StatusMismatch { .. }) => {}
                Err(e) => {
                    tracing::warn!(plan_id = %plan.plan_id, error = %e, "Failed to expire plan")
                }
            }
        }

        if expired > 0 {
            metrics::record_plans_expired(expired);
        }
        expired
    }
}
