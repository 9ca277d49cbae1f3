//! In-memory repositories backed by `DashMap`.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::store::{PlanRepository, ReceiptRepository, StoreError, StoreResult};
use crate::tx::types::{PlanId, PlanStatus, TxPlan, TxReceipt};

/// Thread-safe plan and receipt maps. Clones share the same maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    plans: Arc<DashMap<PlanId, TxPlan>>,
    receipts: Arc<DashMap<PlanId, TxReceipt>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn all_receipts(&self) -> Vec<TxReceipt> {
        self.receipts.iter().map(|r| r.value().clone()).collect()
    }
}

impl PlanRepository for MemoryStore {
    fn get(&self, plan_id: &PlanId) -> Option<TxPlan> {
        self.plans.get(plan_id).map(|r| r.value().clone())
    }

    fn put(&self, plan: TxPlan) {
        self.plans.insert(plan.plan_id, plan);
    }

    fn scan(&self) -> Vec<TxPlan> {
        self.plans.iter().map(|r| r.value().clone()).collect()
    }

    fn transition(
        &self,
        plan_id: &PlanId,
        from: PlanStatus,
        to: PlanStatus,
    ) -> StoreResult<TxPlan> {
        // get_mut holds the shard write lock until the guard drops, so the
        // status check and the write below cannot interleave with another writer.
        let mut entry = self
            .plans
            .get_mut(plan_id)
            .ok_or(StoreError::PlanNotFound(*plan_id))?;

        if entry.status != from {
            return Err(StoreError::StatusMismatch {
                plan_id: *plan_id,
                expected: from,
                actual: entry.status,
            });
        }

        entry.status = to;
        Ok(entry.value().clone())
    }

    fn len(&self) -> usize {
        self.plans.len()
    }
}

impl ReceiptRepository for MemoryStore {
    fn get(&self, plan_id: &PlanId) -> Option<TxReceipt> {
        self.receipts.get(plan_id).map(|r| r.value().clone())
    }

    fn put_if_absent(&self, receipt: TxReceipt) -> StoreResult<()> {
        match self.receipts.entry(receipt.plan_id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateReceipt(receipt.plan_id)),
            Entry::Vacant(slot) => {
                slot.insert(receipt);
                Ok(())
            }
        }
    }

    fn len(&self) -> usize {
        self.receipts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::types::{Asset, BroadcastReceipt, Chain, ReceiptStatus, TxIntent};
    use chrono::Utc;

    fn sample_plan() -> TxPlan {
        let now = Utc::now();
        TxPlan {
            plan_id: PlanId::generate(),
            intent: TxIntent {
                from_wallet_id: "treasury".into(),
                to_address: "0xdead".into(),
                amount: "1.0".into(),
                asset: Asset::native("ETH", 18),
                chain: Chain::Ethereum,
                rail: None,
                memo: None,
            },
            estimated_gas: None,
            estimated_fee: None,
            from_address: "0xbeef".into(),
            created_at: now,
            expires_at: now + chrono::Duration::hours(1),
            status: PlanStatus::Pending,
        }
    }

    fn sample_receipt(plan_id: PlanId) -> TxReceipt {
        BroadcastReceipt {
            tx_hash: "0xabc".into(),
            chain: Chain::Ethereum,
            status: ReceiptStatus::Confirmed,
            block_number: Some(1),
            confirmations: Some(1),
            timestamp: Utc::now(),
            gas_used: None,
            effective_fee: None,
        }
        .into_receipt(plan_id)
    }

    #[test]
    fn test_plan_roundtrip() {
        let store = MemoryStore::new();
        let plan = sample_plan();
        store.put(plan.clone());

        assert_eq!(PlanRepository::get(&store, &plan.plan_id), Some(plan));
        assert_eq!(PlanRepository::len(&store), 1);
        assert!(PlanRepository::get(&store, &PlanId::generate()).is_none());
    }

    #[test]
    fn test_transition_compare_and_set() {
        let store = MemoryStore::new();
        let plan = sample_plan();
        let id = plan.plan_id;
        store.put(plan);

        let updated = store
            .transition(&id, PlanStatus::Pending, PlanStatus::Executing)
            .unwrap();
        assert_eq!(updated.status, PlanStatus::Executing);

        // Second attempt from pending must lose.
        match store.transition(&id, PlanStatus::Pending, PlanStatus::Executing) {
            Err(StoreError::StatusMismatch { actual, .. }) => {
                assert_eq!(actual, PlanStatus::Executing)
            }
            other => panic!("expected status mismatch, got {other:?}"),
        }

        assert!(matches!(
            store.transition(&PlanId::generate(), PlanStatus::Pending, PlanStatus::Executing),
            Err(StoreError::PlanNotFound(_))
        ));
    }

    #[test]
    fn test_receipts_are_write_once() {
        let store = MemoryStore::new();
        let id = PlanId::generate();

        store.put_if_absent(sample_receipt(id)).unwrap();
        assert!(matches!(
            store.put_if_absent(sample_receipt(id)),
            Err(StoreError::DuplicateReceipt(_))
        ));
        assert_eq!(ReceiptRepository::len(&store), 1);
        assert_eq!(ReceiptRepository::get(&store, &id).unwrap().tx_hash, "0xabc");
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        let plan = sample_plan();
        store.put(plan.clone());
        assert!(PlanRepository::get(&other, &plan.plan_id).is_some());
    }
}
