// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - utf16.rs
 */

use crate::Result;

/// Decode a little-endian UTF-16 code-unit run, stopping at the first
/// NUL code unit (or the end of `bytes` if there is none). Unpaired
/// surrogates become the replacement character rather than an error,
/// since a single malformed string should not prevent reading the
/// rest of an otherwise valid property table.
pub(crate) fn convert_utf16_le(bytes: &[u8]) -> Result<String> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();

    Ok(char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}

#[cfg(test)]
mod test {
    use super::convert_utf16_le;

    fn le_bytes(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn test_round_trip_ascii() {
        let bytes = le_bytes("NEUTRAL");
        assert_eq!(convert_utf16_le(&bytes).unwrap(), "NEUTRAL");
    }

    #[test]
    fn test_stops_at_nul() {
        let mut bytes = le_bytes("abc");
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend_from_slice(&le_bytes("xyz"));
        assert_eq!(convert_utf16_le(&bytes).unwrap(), "abc");
    }

    #[test]
    fn test_empty_is_empty_string() {
        assert_eq!(convert_utf16_le(&[]).unwrap(), "");
    }
}
