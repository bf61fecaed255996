// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - camf/mod.rs
 */

mod cipher;
mod record;
mod type4;

pub use record::ElementType;
pub(crate) use record::ArrayRecord;

use crate::io::{ByteReader, Whence};
use crate::{Error, Result};

const CAMF_HEADER_LEN: usize = 28;

/// Parsed CAMF metadata: header fields plus, once decrypted, the
/// named array lookup.
pub(crate) struct CamfContext {
    pub(crate) array_type: u32,
    arrays: record::ArrayMap,
}

impl CamfContext {
    /// Read and decrypt the CAMF section at `entry`, then parse its
    /// record stream into a named array lookup.
    pub(crate) fn read(reader: &ByteReader, offset: u32, length: u32) -> Result<Self> {
        if length < CAMF_HEADER_LEN as u32 {
            return Err(Error::Range);
        }

        reader.seek(offset as i64, Whence::Start)?;
        let header = reader.read(CAMF_HEADER_LEN)?;

        let array_type = read_u32_le(&header, 8)?;
        let predictor = read_u32_le(&header, 16)?;
        let block_count = read_u32_le(&header, 20)?;
        let key_or_block_size = read_u32_le(&header, 24)?;

        let raw_data_size = length - CAMF_HEADER_LEN as u32;
        let mut data = reader.read(raw_data_size as usize)?;

        log::debug!("camf section type {array_type}, key/block_size {key_or_block_size:#x}");

        let arrays = match array_type {
            2 | 3 => {
                cipher::old_camf_decrypt(key_or_block_size, &mut data);
                record::read_camf_records(&data)?
            }
            _ => {
                let decoded = type4::decode(&data, predictor, key_or_block_size, block_count)?;
                record::read_camf_records(&decoded)?
            }
        };

        Ok(CamfContext {
            array_type,
            arrays,
        })
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ArrayRecord> {
        self.arrays.get(name)
    }
}

fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32> {
    buf.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(Error::Range)
}

#[cfg(test)]
mod test {
    use super::*;

    fn build_section(array_type: u32, key: u32, payload: &[u8]) -> Vec<u8> {
        let mut section = Vec::new();
        section.extend_from_slice(b"CAMF");
        section.extend_from_slice(&1u32.to_le_bytes());
        section.extend_from_slice(&array_type.to_le_bytes());
        section.extend_from_slice(&0u32.to_le_bytes()); // unused slot
        section.extend_from_slice(&0u32.to_le_bytes()); // predictor
        section.extend_from_slice(&0u32.to_le_bytes()); // block_count
        section.extend_from_slice(&key.to_le_bytes());
        section.extend_from_slice(payload);
        section
    }

    #[test]
    fn test_short_section_is_range_error() {
        let reader = ByteReader::new(Box::new(std::io::Cursor::new(vec![0u8; 4])));
        assert_eq!(CamfContext::read(&reader, 0, 4), Err(Error::Range));
    }

    #[test]
    fn test_type2_section_decrypts_and_parses() {
        // An empty, already-terminated record stream after decrypt is fine:
        // no CMb-prefixed bytes means the record scanner just returns empty.
        let payload = vec![0u8; 8];
        let section = build_section(2, 0x1234, &payload);
        let reader = ByteReader::new(Box::new(std::io::Cursor::new(section.clone())));
        let ctx = CamfContext::read(&reader, 0, section.len() as u32).unwrap();
        assert_eq!(ctx.array_type, 2);
        assert!(ctx.get("anything").is_none());
    }
}
