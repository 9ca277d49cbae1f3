//! Background expiry sweep.
//!
//! Periodically moves stale pending plans to `expired` and flushes the
//! file store. A final flush runs when shutdown fires.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::store::Stores;
use crate::tx::TxPlanner;

pub async fn run_expiry_sweeper(
    planner: TxPlanner,
    stores: Stores,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately.
    ticker.tick().await;

    tracing::info!(interval_secs = interval.as_secs_f64(), "Expiry sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let expired = planner.cleanup_expired_plans();
                if expired > 0 {
                    tracing::info!(expired = expired, "Expired stale plans");
                }
                flush(&stores);
            }
            _ = shutdown.recv() => break,
        }
    }

    flush(&stores);
    tracing::info!("Expiry sweeper stopped");
}

fn flush(stores: &Stores) {
    if let Err(e) = stores.flush() {
        tracing::warn!(error = %e, "Failed to flush store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::signer::MockSigner;
    use crate::tx::types::{Asset, Chain, PlanStatus, TxIntent, WalletId};

    fn intent() -> TxIntent {
        TxIntent {
            from_wallet_id: WalletId::new("demo-wallet"),
            to_address: "0xabc".into(),
            amount: "1".into(),
            asset: Asset::native("ETH", 18),
            chain: Chain::Ethereum,
            rail: None,
            memo: None,
        }
    }

    #[tokio::test]
    async fn test_sweeper_expires_and_stops() {
        let stores = Stores::in_memory();
        let config = PlannerConfig {
            plan_ttl_secs: 0,
            ..PlannerConfig::default()
        };
        let planner = TxPlanner::new(stores.plans.clone(), config);
        let signer = MockSigner::new().with_wallet("demo-wallet", "0x1");
        let plan = planner.plan_transfer(intent(), &signer).await.unwrap();

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(run_expiry_sweeper(
            planner.clone(),
            stores,
            Duration::from_millis(10),
            rx,
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(
            planner.get_tx_plan(&plan.plan_id).unwrap().status,
            PlanStatus::Expired
        );
    }

    #[tokio::test]
    async fn test_sweeper_flushes_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        let config = crate::config::StoreConfig {
            persistence_path: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let stores = Stores::open(&config).unwrap();
        let planner = TxPlanner::new(stores.plans.clone(), PlannerConfig::default());
        let signer = MockSigner::new().with_wallet("demo-wallet", "0x1");
        planner.plan_transfer(intent(), &signer).await.unwrap();

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(run_expiry_sweeper(
            planner,
            stores,
            Duration::from_secs(3600),
            rx,
        ));
        tx.send(()).unwrap();
        handle.await.unwrap();

        let reopened = Stores::open(&config).unwrap();
        assert_eq!(reopened.plans.len(), 1);
    }
}
