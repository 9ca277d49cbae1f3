//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (parse bodies into intents / plan ids)
//!     → handlers.rs (call planner / executor)
//!     → response.rs (map errors to status codes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
