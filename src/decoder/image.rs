// src/decoder/image.rs

use base64::{engine::general_purpose, Engine as _};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Wraps raw bytes in a `data:` URL; the payload is not re-encoded.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = mime.trim();
    let mime = if mime.is_empty() { FALLBACK_MIME } else { mime };
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declared_mime() {
        assert_eq!(to_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn missing_mime_falls_back_to_octet_stream() {
        assert_eq!(to_data_url("  ", b""), "data:application/octet-stream;base64,");
    }
}
