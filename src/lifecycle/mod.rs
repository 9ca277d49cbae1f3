//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → HTTP server drains, sweeper stops → final store flush
//!
//! Sweeper (sweeper.rs):
//!     every interval → cleanup_expired_plans → flush file store
//! ```

pub mod shutdown;
pub mod signals;
pub mod sweeper;

pub use shutdown::Shutdown;
pub use sweeper::run_expiry_sweeper;
