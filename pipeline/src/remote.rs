//! HTTP adapters for the external capabilities.
//!
//! Each adapter wraps one sidecar service behind a small JSON contract.
//! A reachable service answering with a non-success status is a
//! `Declined`; failing to reach it at all is a `Transport` failure.

use crate::capability::{CapabilityError, ContentStore, LedgerAnchor, TextExtractor};
use async_trait::async_trait;
use serde::Deserialize;
use veridoc_types::ContentHash;

fn transport(e: reqwest::Error) -> CapabilityError {
    CapabilityError::Transport(e.to_string())
}

async fn declined(what: &str, response: reqwest::Response) -> CapabilityError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    CapabilityError::Declined(format!("{what} returned {status}: {body}"))
}

/// OCR sidecar: `POST {base}/extract` with the raw image, answers
/// `{"text": "..."}`.
pub struct HttpTextExtractor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTextExtractor {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
struct ExtractResponse {
    text: String,
}

#[async_trait]
impl TextExtractor for HttpTextExtractor {
    async fn extract_text(&self, image: &[u8]) -> Result<String, CapabilityError> {
        let response = self
            .client
            .post(format!("{}/extract", self.base_url.trim_end_matches('/')))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(declined("OCR service", response).await);
        }
        let body: ExtractResponse = response.json().await.map_err(transport)?;
        Ok(body.text)
    }
}

/// Pinning gateway: `POST {base}/pin` with the file, answers
/// `{"cid": "..."}`.
pub struct HttpContentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
struct PinResponse {
    cid: String,
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn pin(&self, file: &[u8]) -> Result<String, CapabilityError> {
        let response = self
            .client
            .post(format!("{}/pin", self.base_url.trim_end_matches('/')))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(file.to_vec())
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(declined("content store", response).await);
        }
        let body: PinResponse = response.json().await.map_err(transport)?;
        Ok(body.cid)
    }
}

/// Ledger relay: `POST {base}/anchor` with `{"hash": "0x..."}`, answers
/// `{"transactionHash": "0x..."}`.
pub struct HttpLedgerAnchor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLedgerAnchor {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorResponse {
    transaction_hash: String,
}

#[async_trait]
impl LedgerAnchor for HttpLedgerAnchor {
    async fn anchor(&self, digest: &ContentHash) -> Result<String, CapabilityError> {
        let response = self
            .client
            .post(format!("{}/anchor", self.base_url.trim_end_matches('/')))
            .json(&serde_json::json!({ "hash": digest.as_str() }))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(declined("ledger relay", response).await);
        }
        let body: AnchorResponse = response.json().await.map_err(transport)?;
        Ok(body.transaction_hash)
    }
}
