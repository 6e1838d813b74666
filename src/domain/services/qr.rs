//! Registration token issuance and QR rendering. The token is a random
//! UUID whose uniqueness is enforced by the `registrations.token` unique
//! constraint, not re-checked here.

use crate::error::AppError;
use base64::{engine::general_purpose, Engine as _};
use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;
use uuid::Uuid;

// Pixels per module and quiet-zone width in modules.
const MODULE_PX: u32 = 8;
const QUIET_ZONE: u32 = 4;

pub fn issue_token() -> String {
    Uuid::new_v4().to_string()
}

/// Renders `data` as an error-corrected QR code and returns the PNG
/// base64-encoded. Deterministic for a given payload, safe to re-run.
pub fn qr_png_base64(data: &str) -> Result<String, AppError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::InternalWithMsg(format!("QR encoding failed: {}", e)))?;

    let width = code.width() as u32;
    let modules = code.to_colors();
    let dim = (width + 2 * QUIET_ZONE) * MODULE_PX;

    let mut img = GrayImage::from_pixel(dim, dim, Luma([255u8]));
    for (i, module) in modules.iter().enumerate() {
        if *module != Color::Dark {
            continue;
        }
        let mx = (i as u32 % width + QUIET_ZONE) * MODULE_PX;
        let my = (i as u32 / width + QUIET_ZONE) * MODULE_PX;
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                img.put_pixel(mx + dx, my + dy, Luma([0u8]));
            }
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| AppError::InternalWithMsg(format!("QR PNG encoding failed: {}", e)))?;

    Ok(general_purpose::STANDARD.encode(buffer.into_inner()))
}

/// Absolute registration URL for an event, used as the payload of the
/// event-level QR code. The base URL is passed in explicitly.
pub fn registration_url(site_url: &str, slug: &str) -> String {
    format!("{}/events/{}/register", site_url.trim_end_matches('/'), slug)
}
