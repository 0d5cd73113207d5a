//! Shared utilities for the Veridoc service.

pub mod logging;

pub use logging::init_tracing;
