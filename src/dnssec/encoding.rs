//! RFC 3548 Base64 decoding of DNSKEY public keys.

use super::{KeyTagError, Result};
use base64::alphabet;
use base64::{DecodeError, Engine};
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Standard alphabet, padding required, non-zero trailing bits tolerated
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Decode a presentation-format Base64 string.
///
/// The input must already have its whitespace removed. Errors name the
/// offending four-symbol group.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let bytes = input.as_bytes();

    if let Some(pos) = bytes.iter().position(|&b| !is_symbol(b)) {
        return Err(invalid_group(bytes, pos));
    }

    let extra = bytes.len() % 4;
    if extra != 0 {
        return Err(KeyTagError::TruncatedBase64 { extra });
    }

    ENGINE.decode(bytes).map_err(|e| {
        let pos = match e {
            DecodeError::InvalidByte(pos, _) | DecodeError::InvalidLastSymbol(pos, _) => pos,
            // Misplaced padding in the final group
            _ => bytes.len().saturating_sub(1),
        };
        invalid_group(bytes, pos)
    })
}

fn is_symbol(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

fn invalid_group(bytes: &[u8], pos: usize) -> KeyTagError {
    let start = pos - pos % 4;
    let end = (start + 4).min(bytes.len());
    KeyTagError::InvalidBase64Symbol {
        run: String::from_utf8_lossy(&bytes[start..end]).into_owned(),
    }
}
