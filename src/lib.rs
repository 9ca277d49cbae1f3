//! Agent wallet: transaction planning and execution behind a signing boundary.
//!
//! Agents describe transfers as intents; the planner validates them and
//! stores pending plans, the executor turns a pending plan into exactly one
//! broadcast, and only the signer ever touches key material.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod signer;
pub mod store;
pub mod tx;

pub use config::schema::WalletConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use signer::{Signer, SignerBackend};
pub use tx::{TxExecutor, TxPlanner, WalletError};
