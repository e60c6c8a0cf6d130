//! QR rendering for ticket credentials.
//!
//! Renders a token payload into a 2-D barcode PNG and wraps it in a
//! `data:image/png;base64,` URI so it can be embedded directly in an API
//! response or an `<img>` tag. High error correction so a partially
//! damaged or poorly lit print still scans at the venue gate.

use base64::Engine as _;
use image::Luma;
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use thiserror::Error;

/// Minimum rendered dimension in pixels.
const MIN_DIMENSION: u32 = 256;

/// Error produced while rendering a QR image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QrError {
    /// Payload could not be encoded as a QR code.
    #[error("QR encoding failed: {0}")]
    Encode(String),

    /// PNG serialization failed.
    #[error("PNG serialization failed: {0}")]
    Png(String),
}

/// Render `data` into a PNG QR image returned as a base64 data URI.
///
/// # Errors
///
/// Returns [`QrError::Encode`] if the payload exceeds QR capacity and
/// [`QrError::Png`] if image serialization fails; neither occurs for
/// well-formed token payloads.
pub fn render_png_data_uri(data: &str) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::H)
        .map_err(|e| QrError::Encode(e.to_string()))?;

    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .map_err(|e| QrError::Png(e.to_string()))?;

    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::secret::SecurityKey;
    use crate::token::TicketToken;
    use crate::types::TicketId;

    #[test]
    fn renders_data_uri_with_png_prefix() {
        let uri = render_png_data_uri("1:abc:def").unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn encoded_image_is_valid_base64_png() {
        let token = TicketToken::new(
            TicketId(1),
            SecurityKey::generate(),
            SecurityKey::generate(),
        );
        let uri = render_png_data_uri(&token.encode()).unwrap();
        let b64 = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .unwrap();
        // PNG magic number.
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn distinct_payloads_render_distinct_images() {
        let a = render_png_data_uri("1:aa:bb").unwrap();
        let b = render_png_data_uri("2:aa:bb").unwrap();
        assert_ne!(a, b);
    }
}
