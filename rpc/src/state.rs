//! Shared state handed to every request handler.

use crate::metrics::ApiMetrics;
use crate::session::SessionManager;
use std::sync::Arc;
use veridoc_pipeline::{DisclosureGate, VerificationOrchestrator};
use veridoc_store::{ContactStore, RecordStore, SettingsStore, UserStore};

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub records: Arc<dyn RecordStore>,
    pub contacts: Arc<dyn ContactStore>,
    pub orchestrator: Arc<VerificationOrchestrator>,
    pub gate: Arc<DisclosureGate>,
    pub sessions: Arc<SessionManager>,
    pub metrics: Arc<ApiMetrics>,
}
