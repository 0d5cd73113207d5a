//! QR artifact issuance.
//!
//! A verified record gets a globally-unique QR id wrapped in a
//! fixed-shape redirect link, rendered as a scannable PNG data URL. The
//! id and link are stable and persisted with the record; the image is
//! not stored and is re-rendered from the link on demand.

use crate::error::PipelineError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};
use qrcode::{Color, QrCode};
use veridoc_types::QrId;

/// Pixels per QR module.
const MODULE_SCALE: u32 = 8;
/// Quiet-zone width in modules on each side.
const QUIET_MODULES: u32 = 4;

/// The scannable artifact issued for a verified document.
#[derive(Clone, Debug)]
pub struct QrArtifact {
    pub qr_id: QrId,
    /// `<base_url>/verify-qr?id=<qr_id>` — what the QR image encodes.
    pub link: String,
    /// `data:image/png;base64,...` rendering of `link`.
    pub png_data_url: String,
}

impl QrArtifact {
    /// Mint a fresh QR id and render its artifact.
    pub fn issue(base_url: &str) -> Result<Self, PipelineError> {
        Self::for_id(base_url, QrId::generate())
    }

    /// Re-render the artifact for an existing id (idempotent reuse path:
    /// the image is not persisted, only the id and link shape are).
    pub fn for_id(base_url: &str, qr_id: QrId) -> Result<Self, PipelineError> {
        let link = redirect_link(base_url, &qr_id);
        let png_data_url = render_data_url(&link)?;
        Ok(Self {
            qr_id,
            link,
            png_data_url,
        })
    }
}

/// The fixed link shape embedded in every QR code.
pub fn redirect_link(base_url: &str, qr_id: &QrId) -> String {
    format!("{}/verify-qr?id={}", base_url.trim_end_matches('/'), qr_id)
}

/// Encode a link as a PNG data URL.
pub fn render_data_url(link: &str) -> Result<String, PipelineError> {
    let code = QrCode::new(link.as_bytes())
        .map_err(|e| PipelineError::Internal(format!("QR encoding failed: {e}")))?;

    let modules = code.width() as u32;
    let size = (modules + 2 * QUIET_MODULES) * MODULE_SCALE;
    let mut img = GrayImage::from_pixel(size, size, Luma([0xff]));

    for y in 0..code.width() {
        for x in 0..code.width() {
            if code[(x, y)] == Color::Dark {
                let px = (x as u32 + QUIET_MODULES) * MODULE_SCALE;
                let py = (y as u32 + QUIET_MODULES) * MODULE_SCALE;
                for dy in 0..MODULE_SCALE {
                    for dx in 0..MODULE_SCALE {
                        img.put_pixel(px + dx, py + dy, Luma([0x00]));
                    }
                }
            }
        }
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(img.as_raw(), size, size, ExtendedColorType::L8)
        .map_err(|e| PipelineError::Internal(format!("PNG encoding failed: {e}")))?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
}
