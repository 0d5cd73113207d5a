//! Veridoc daemon — entry point for running the verification service.

mod config;

use anyhow::Context;
use clap::Parser;
use config::{CapabilityMode, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use veridoc_pipeline::dev::{LocalContentStore, LocalLedgerAnchor, PassthroughExtractor};
use veridoc_pipeline::remote::{HttpContentStore, HttpLedgerAnchor, HttpTextExtractor};
use veridoc_pipeline::{
    ContentStore, DisclosureGate, ExtractionWorker, LedgerAnchor, TextExtractor,
    VerificationOrchestrator,
};
use veridoc_rpc::{ApiMetrics, ApiServer, AppState, SessionManager};
use veridoc_store::AuthorizationStore;
use veridoc_store_memory::MemoryStore;

#[derive(Parser)]
#[command(name = "veridoc-daemon", about = "Veridoc document verification service")]
struct Cli {
    /// Port for the API server.
    #[arg(long, env = "VERIDOC_PORT")]
    port: Option<u16>,

    /// Base URL embedded in issued QR links.
    #[arg(long, env = "VERIDOC_BASE_URL")]
    base_url: Option<String>,

    /// Capability wiring: "dev" or "remote".
    #[arg(long, env = "VERIDOC_CAPABILITY_MODE")]
    capability_mode: Option<String>,

    /// OCR sidecar base URL (remote mode).
    #[arg(long, env = "VERIDOC_OCR_URL")]
    ocr_url: Option<String>,

    /// Pinning gateway base URL (remote mode).
    #[arg(long, env = "VERIDOC_PIN_URL")]
    pin_url: Option<String>,

    /// Ledger relay base URL (remote mode).
    #[arg(long, env = "VERIDOC_ANCHOR_URL")]
    anchor_url: Option<String>,

    /// Bound on each external capability call, in seconds.
    #[arg(long, env = "VERIDOC_CALL_TIMEOUT_SECS")]
    call_timeout_secs: Option<u64>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    veridoc_utils::init_tracing();

    let cli = Cli::parse();

    let file_config: ServerConfig = if let Some(ref config_path) = cli.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file {}", config_path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", config_path.display()))?;
        tracing::info!("Loaded config from {}", config_path.display());
        config
    } else {
        ServerConfig::default()
    };

    let cli_mode = match cli.capability_mode.as_deref() {
        Some("dev") => Some(CapabilityMode::Dev),
        Some("remote") => Some(CapabilityMode::Remote),
        Some(other) => anyhow::bail!("unknown capability mode {other:?}, expected dev or remote"),
        None => None,
    };

    let config = ServerConfig {
        port: cli.port.unwrap_or(file_config.port),
        base_url: cli.base_url.unwrap_or(file_config.base_url),
        capability_mode: cli_mode.unwrap_or(file_config.capability_mode),
        ocr_url: cli.ocr_url.unwrap_or(file_config.ocr_url),
        pin_url: cli.pin_url.unwrap_or(file_config.pin_url),
        anchor_url: cli.anchor_url.unwrap_or(file_config.anchor_url),
        call_timeout_secs: cli.call_timeout_secs.unwrap_or(file_config.call_timeout_secs),
        authorized: file_config.authorized,
    };

    let store = Arc::new(MemoryStore::new());
    for entry in config.authorized.clone() {
        store.insert_authorized(&entry.into())?;
    }
    tracing::info!(
        "Seeded {} authorization registry entries",
        config.authorized.len()
    );

    let (extraction, content_store, ledger): (_, Arc<dyn ContentStore>, Arc<dyn LedgerAnchor>) =
        match config.capability_mode {
            CapabilityMode::Dev => {
                tracing::info!("Using in-process dev capabilities");
                let extraction = ExtractionWorker::spawn(|| async {
                    Ok(Box::new(PassthroughExtractor) as Box<dyn TextExtractor>)
                });
                (extraction, Arc::new(LocalContentStore), Arc::new(LocalLedgerAnchor))
            }
            CapabilityMode::Remote => {
                tracing::info!(
                    ocr = %config.ocr_url,
                    pin = %config.pin_url,
                    anchor = %config.anchor_url,
                    "Using remote capabilities",
                );
                let client = reqwest::Client::new();
                let ocr_client = client.clone();
                let ocr_url = config.ocr_url.clone();
                let extraction = ExtractionWorker::spawn(move || async move {
                    Ok(Box::new(HttpTextExtractor::new(ocr_client, ocr_url))
                        as Box<dyn TextExtractor>)
                });
                (
                    extraction,
                    Arc::new(HttpContentStore::new(client.clone(), config.pin_url.clone())),
                    Arc::new(HttpLedgerAnchor::new(client, config.anchor_url.clone())),
                )
            }
        };

    let orchestrator = Arc::new(VerificationOrchestrator::new(
        store.clone(),
        store.clone(),
        extraction,
        content_store,
        ledger,
        config.base_url.clone(),
        Duration::from_secs(config.call_timeout_secs),
    ));
    let gate = Arc::new(DisclosureGate::new(store.clone(), store.clone()));

    let state = AppState {
        users: store.clone(),
        settings: store.clone(),
        records: store.clone(),
        contacts: store,
        orchestrator,
        gate,
        sessions: Arc::new(SessionManager::new()),
        metrics: Arc::new(ApiMetrics::new()),
    };

    tracing::info!("Starting Veridoc API server on port {}", config.port);
    ApiServer::new(config.port, state)
        .start()
        .await
        .context("API server failed")?;

    Ok(())
}
