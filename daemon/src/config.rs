//! Daemon configuration.
//!
//! Loaded from a TOML file when one is given; CLI flags and environment
//! variables override file values.

use serde::Deserialize;
use veridoc_types::AuthorizedDocument;

/// Capability wiring: in-process deterministic stand-ins or HTTP
/// sidecar services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityMode {
    /// `dev::PassthroughExtractor` and friends; no sidecars needed.
    Dev,
    /// HTTP adapters; requires the three service URLs.
    Remote,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the API server listens on.
    pub port: u16,
    /// Base URL embedded in issued QR links.
    pub base_url: String,
    /// How external capabilities are provided.
    pub capability_mode: CapabilityMode,
    /// OCR sidecar base URL (remote mode).
    pub ocr_url: String,
    /// Pinning gateway base URL (remote mode).
    pub pin_url: String,
    /// Ledger relay base URL (remote mode).
    pub anchor_url: String,
    /// Bound on each external capability call, in seconds.
    pub call_timeout_secs: u64,
    /// Authorization registry entries seeded at startup.
    pub authorized: Vec<AuthorizedEntry>,
}

/// One `[[authorized]]` entry in the config file.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorizedEntry {
    pub doc_number: String,
    pub doc_type: String,
}

impl From<AuthorizedEntry> for AuthorizedDocument {
    fn from(entry: AuthorizedEntry) -> Self {
        AuthorizedDocument {
            doc_number: entry.doc_number,
            doc_type: entry.doc_type,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            base_url: "http://localhost:8080".into(),
            capability_mode: CapabilityMode::Dev,
            ocr_url: "http://localhost:9090".into(),
            pin_url: "http://localhost:9091".into(),
            anchor_url: "http://localhost:9092".into(),
            call_timeout_secs: 30,
            authorized: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.capability_mode, CapabilityMode::Dev);
        assert_eq!(config.call_timeout_secs, 30);
        assert!(config.authorized.is_empty());
    }

    #[test]
    fn full_file_parses() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 9000
            base_url = "https://veridoc.example"
            capability_mode = "remote"
            ocr_url = "http://ocr:9090"
            call_timeout_secs = 10

            [[authorized]]
            doc_number = "AB123"
            doc_type = "Passport"

            [[authorized]]
            doc_number = "CD456"
            doc_type = "License"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.capability_mode, CapabilityMode::Remote);
        assert_eq!(config.ocr_url, "http://ocr:9090");
        assert_eq!(config.authorized.len(), 2);
        assert_eq!(config.authorized[1].doc_number, "CD456");
    }
}
