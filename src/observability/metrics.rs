//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_plans_created_total` (counter): plans created, by chain
//! - `wallet_plans_expired_total` (counter): plans moved to expired by sweeps
//! - `wallet_executions_total` (counter): executions by outcome
//!   (completed, failed, rejected, unrecorded, aborted)
//! - `wallet_http_requests_total` (counter): API requests by route and status
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so the core can be
//!   used (and tested) without an exporter
//! - Prometheus exporter listens on its own address

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::tx::types::Chain;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_plan_created(chain: Chain) {
    counter!("wallet_plans_created_total", "chain" => chain.as_str()).increment(1);
}

pub fn record_plans_expired(count: usize) {
    counter!("wallet_plans_expired_total").increment(count as u64);
}

pub fn record_execution(outcome: &'static str) {
    counter!("wallet_executions_total", "outcome" => outcome).increment(1);
}

pub fn record_request(route: &'static str, status: u16) {
    counter!(
        "wallet_http_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}
