//! Base64 decoding utilities
//!
//! Share links carry base64 segments in both the URL-safe and standard
//! alphabets, usually without padding. This module provides a lenient decoder
//! that re-pads the input and tolerates either alphabet.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use tracing::trace;

// ============================================================================
// Lenient Base64 Decoding
// ============================================================================

/// Decodes a base64 segment into text, leniently.
///
/// The input is padded with `=` to the next multiple of 4 and decoded with the
/// URL-safe alphabet, falling back to the standard alphabet. Invalid byte
/// sequences in the decoded bytes are dropped rather than failing the decode.
///
/// Returns an empty string when decoding fails entirely; callers expecting
/// content must treat an empty result as a failure.
pub fn decode_lenient(text: &str) -> String {
    let padded = pad_base64(text);

    let bytes = match URL_SAFE.decode(&padded) {
        Ok(bytes) => bytes,
        Err(_) => match STANDARD.decode(&padded) {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!("Base64 decode failed: {}", e);
                return String::new();
            }
        },
    };

    // Drop invalid sequences instead of failing the whole segment
    String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Adds proper padding to a base64 string if missing
///
/// Base64 strings should have a length that is a multiple of 4.
/// This function adds '=' padding characters as needed.
pub fn pad_base64(s: &str) -> String {
    let mut result = s.to_string();
    while !result.len().is_multiple_of(4) {
        result.push('=');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lenient_url_safe() {
        // "hello-world?" uses - and _ in its URL-safe encoding
        assert_eq!(decode_lenient("aGVsbG8td29ybGQ_"), "hello-world?");
    }

    #[test]
    fn test_decode_lenient_standard_alphabet() {
        let encoded = STANDARD.encode("subjects?_d=1");
        assert_eq!(decode_lenient(&encoded), "subjects?_d=1");
    }

    #[test]
    fn test_decode_lenient_without_padding() {
        assert_eq!(decode_lenient("YWVzLTI1Ni1nY206cGFzcw"), "aes-256-gcm:pass");
    }

    #[test]
    fn test_decode_lenient_with_padding() {
        assert_eq!(
            decode_lenient("YWVzLTI1Ni1nY206cGFzcw=="),
            "aes-256-gcm:pass"
        );
    }

    #[test]
    fn test_decode_lenient_invalid_returns_empty() {
        assert_eq!(decode_lenient("not valid base64!!!"), "");
    }

    #[test]
    fn test_decode_lenient_empty_input() {
        assert_eq!(decode_lenient(""), "");
    }

    #[test]
    fn test_decode_lenient_drops_invalid_utf8() {
        // 0xff can never start a UTF-8 sequence
        let encoded = STANDARD.encode([b'o', b'k', 0xff, b'!']);
        assert_eq!(decode_lenient(&encoded), "ok!");
    }

    #[test]
    fn test_pad_base64_none_needed() {
        assert_eq!(pad_base64("abcd"), "abcd");
        assert_eq!(pad_base64("abcdabcd"), "abcdabcd");
    }

    #[test]
    fn test_pad_base64_one_needed() {
        assert_eq!(pad_base64("abc"), "abc=");
    }

    #[test]
    fn test_pad_base64_two_needed() {
        assert_eq!(pad_base64("ab"), "ab==");
    }

    #[test]
    fn test_pad_base64_empty() {
        assert_eq!(pad_base64(""), "");
    }
}
