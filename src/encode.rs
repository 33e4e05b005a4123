//! Base64 encoding for Contents API request bodies.
//!
//! The GitHub Contents API takes file content as standard (padded) base64 in
//! the JSON `content` field. Browser file readers hand content back as a data
//! URL (`data:application/pdf;base64,JVBERi0...`); only the part after the
//! first comma is the payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Encode raw bytes as standard base64.
pub fn encode_content(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    b64
}

/// Encode UTF-8 text (the redirect page) as standard base64.
pub fn encode_text(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Drop a `data:<mime>;base64,` prefix if present.
pub fn strip_data_url_prefix(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_standard_padded() {
        assert_eq!(encode_content(b"%PDF"), "JVBERg==");
        assert_eq!(encode_content(b""), "");
    }

    #[test]
    fn encodes_non_ascii_text_as_utf8() {
        let b64 = encode_text("é");
        assert_eq!(STANDARD.decode(b64).unwrap(), "é".as_bytes());
    }

    #[test]
    fn strips_data_url_prefix() {
        assert_eq!(
            strip_data_url_prefix("data:application/pdf;base64,JVBERg=="),
            "JVBERg=="
        );
        assert_eq!(strip_data_url_prefix("JVBERg=="), "JVBERg==");
    }
}
