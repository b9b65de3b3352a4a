//! MIME encoding utilities.
//!
//! Generation-side encoders: Base64, Quoted-Printable, and RFC 2047
//! header encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Maximum line length for encoded content.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 wrapped at 76 columns for message bodies.
#[must_use]
pub fn encode_base64_mime(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + 2 * (encoded.len() / MAX_LINE_LENGTH));

    for (i, c) in encoded.chars().enumerate() {
        if i > 0 && i % MAX_LINE_LENGTH == 0 {
            result.push_str("\r\n");
        }
        result.push(c);
    }

    result
}

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Encodes bytes that are not printable ASCII or would interfere
/// with email transmission.
#[must_use]
pub fn encode_quoted_printable(text: &str) -> String {
    let mut result = String::new();
    let mut line_length = 0;

    for byte in text.as_bytes() {
        // Soft line break before the line overruns
        if line_length >= MAX_LINE_LENGTH - 3 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        match byte {
            // Printable ASCII except '=' and space (handle separately)
            b'!'..=b'<' | b'>'..=b'~' => {
                result.push(*byte as char);
                line_length += 1;
            }
            // Space needs special handling (encode at line end)
            b' ' => {
                if line_length >= MAX_LINE_LENGTH - 1 {
                    result.push_str("=20");
                    line_length += 3;
                } else {
                    result.push(' ');
                    line_length += 1;
                }
            }
            // Everything else gets encoded
            _ => {
                result.push('=');
                let _ = write!(result, "{byte:02X}");
                line_length += 3;
            }
        }
    }

    result
}

/// Encodes a header value using RFC 2047 B-encoding.
///
/// Format: `=?charset?B?encoded-text?=`. Pure ASCII input without the
/// RFC 2047 trigger characters is returned unchanged.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && c != '=' && c != '?') {
        return text.to_string();
    }

    let encoded = encode_base64(text.as_bytes());
    format!("=?{charset}?B?{encoded}?=")
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_encode() {
        assert_eq!(encode_base64(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
    }

    #[test]
    fn test_base64_mime_wrapping() {
        let data = vec![0u8; 100];
        let encoded = encode_base64_mime(&data);
        for line in encoded.split("\r\n") {
            assert!(line.len() <= MAX_LINE_LENGTH);
        }
    }

    #[test]
    fn test_base64_mime_short_input_unwrapped() {
        let encoded = encode_base64_mime(b"Hello");
        assert!(!encoded.contains("\r\n"));
    }

    #[test]
    fn test_quoted_printable_encode() {
        assert_eq!(encode_quoted_printable("Hello, World!"), "Hello, World!");

        let encoded = encode_quoted_printable("Héllo, Wørld!");
        assert!(encoded.contains("=C3"));
    }

    #[test]
    fn test_quoted_printable_equals_sign() {
        assert_eq!(encode_quoted_printable("a=b"), "a=3Db");
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        let long = "x".repeat(200);
        let encoded = encode_quoted_printable(&long);
        assert!(encoded.contains("=\r\n"));
    }

    #[test]
    fn test_rfc2047_encode_ascii() {
        assert_eq!(encode_rfc2047("Hello", "utf-8"), "Hello");
    }

    #[test]
    fn test_rfc2047_encode_non_ascii() {
        let encoded = encode_rfc2047("Héllo", "utf-8");
        assert!(encoded.starts_with("=?utf-8?B?"));
        assert!(encoded.ends_with("?="));
    }

    #[test]
    fn test_rfc2047_encode_trigger_chars() {
        let encoded = encode_rfc2047("a=b?c", "utf-8");
        assert!(encoded.starts_with("=?utf-8?B?"));
    }

    proptest! {
        #[test]
        fn prop_quoted_printable_output_is_ascii(s in any::<String>()) {
            let encoded = encode_quoted_printable(&s);
            prop_assert!(encoded.is_ascii());
        }

        #[test]
        fn prop_base64_mime_lines_bounded(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let encoded = encode_base64_mime(&data);
            for line in encoded.split("\r\n") {
                prop_assert!(line.len() <= MAX_LINE_LENGTH);
            }
        }

        #[test]
        fn prop_rfc2047_output_is_ascii(s in any::<String>()) {
            let encoded = encode_rfc2047(&s, "utf-8");
            prop_assert!(encoded.is_ascii());
        }
    }
}
