//! PNG encoding and data URI validation.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// PNG magic bytes: 89 50 4E 47 0D 0A 1A 0A
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Encodes an RGBA canvas as PNG bytes. `None` only on encoder failure,
/// which callers treat as "no image available".
pub(crate) fn encode_png(canvas: &RgbaImage) -> Option<Vec<u8>> {
    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas.clone())
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .ok()?;
    Some(png)
}

/// Wraps PNG bytes in an embeddable data URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, BASE64.encode(png))
}

/// Checks that a submitted field value is a base64 PNG data URI with
/// valid magic bytes.
pub fn validate_png_data_uri(uri: &str) -> Result<(), &'static str> {
    let encoded = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or("value is not a PNG data URI")?;
    let bytes = BASE64
        .decode(encoded)
        .map_err(|_| "invalid base64 in data URI")?;
    if bytes.len() < PNG_MAGIC.len() {
        return Err("PNG data too short");
    }
    if !bytes.starts_with(&PNG_MAGIC) {
        return Err("invalid PNG magic bytes");
    }
    Ok(())
}

/// Decodes the PNG bytes out of a data URI, if it is one.
pub fn decode_png_data_uri(uri: &str) -> Option<Vec<u8>> {
    let encoded = uri.strip_prefix(PNG_DATA_URI_PREFIX)?;
    BASE64.decode(encoded).ok()
}
