//! HTTP API for the Veridoc service.
//!
//! Session-cookie authentication, JSON request/response bodies, and a
//! multipart upload endpoint feeding the verification pipeline. Errors
//! map onto the 400/401/403/404/503/500 status taxonomy via
//! [`ApiError`].

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use metrics::ApiMetrics;
pub use server::{router, ApiServer};
pub use session::SessionManager;
pub use state::AppState;
