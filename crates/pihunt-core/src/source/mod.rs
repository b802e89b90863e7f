//! Digit sources: where the hex digits of π come from.
//!
//! All sources produce the same thing — batches of ASCII hex digits
//! starting immediately after the leading "3." — so the search loop never
//! cares whether it is reading a billion-digit file, a zip of one, or the
//! paginated web API.

mod api;
mod file;
mod zip;

#[cfg(test)]
pub mod mock;

pub use api::{ApiSource, fetch_digits};
pub use file::HexFileSource;
pub use zip::ZipDigitSource;

#[cfg(test)]
pub use mock::MemorySource;

use crate::error::{Error, Result};

/// Conventional file names from the archive.org billion-digit download.
pub const HEX_FILE: &str = "pi_hex_1b.txt";
pub const ZIP_FILE: &str = "pi_hex_1b.zip";

/// Order-preserving producer of ASCII hex digits (`0-9`, `a-f`).
///
/// `Ok(None)` signals exhaustion; unbounded sources never return it.
pub trait DigitSource {
    fn next_batch(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Value of one ASCII hex digit. `position` only feeds the error report
/// and should be 1-based, like every reported digit offset.
pub fn nibble_value(digit: u8, position: u64) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        _ => Err(Error::InvalidDigit {
            byte: digit,
            position,
        }),
    }
}

/// Decode a run of hex digits into bytes, two digits per byte.
pub fn decode_pairs(digits: &[u8]) -> Result<Vec<u8>> {
    if digits.len() % 2 != 0 {
        return Err(Error::SourceFormat(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }
    digits
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let high = nibble_value(pair[0], 2 * i as u64 + 1)?;
            let low = nibble_value(pair[1], 2 * i as u64 + 2)?;
            Ok(high << 4 | low)
        })
        .collect()
}

/// Lowercase hex rendition of a byte run, the inverse of [`decode_pairs`].
pub fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Infallible for String.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_values() {
        assert_eq!(nibble_value(b'0', 0).unwrap(), 0);
        assert_eq!(nibble_value(b'9', 0).unwrap(), 9);
        assert_eq!(nibble_value(b'a', 0).unwrap(), 10);
        assert_eq!(nibble_value(b'f', 0).unwrap(), 15);
    }

    #[test]
    fn test_invalid_digit_carries_position() {
        let err = nibble_value(b'G', 1234).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDigit {
                byte: b'G',
                position: 1234
            }
        ));
    }

    #[test]
    fn test_decode_pairs_round_trip() {
        let bytes = decode_pairs(b"243f6a88").unwrap();
        assert_eq!(bytes, vec![0x24, 0x3f, 0x6a, 0x88]);
        assert_eq!(hex_string(&bytes), "243f6a88");
    }

    #[test]
    fn test_decode_pairs_reports_one_based_positions() {
        let err = decode_pairs(b"24x1").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDigit {
                byte: b'x',
                position: 3
            }
        ));
    }

    #[test]
    fn test_decode_pairs_rejects_odd_length() {
        assert!(matches!(
            decode_pairs(b"243"),
            Err(Error::SourceFormat(_))
        ));
    }
}
