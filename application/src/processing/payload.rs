//! Text transport of image bytes: base64 with an optional data-URI header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as Base64;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Drops everything up to and including the first comma, if any.
#[must_use]
pub fn strip_data_uri(payload: &str) -> &str {
    payload
        .split_once(',')
        .map_or(payload, |(_, encoded)| encoded)
}

/// Decodes a base64 payload, tolerating a data-URI header and embedded
/// whitespace such as line wraps.
pub fn decode(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let encoded = strip_data_uri(payload.trim());
    if encoded.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        Base64.decode(compact)
    } else {
        Base64.decode(encoded)
    }
}

#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    Base64.encode(bytes)
}

#[must_use]
pub fn encode_png_data_uri(bytes: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", encode(bytes))
}
