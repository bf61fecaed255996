// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - property.rs
 */

use byteorder::{LittleEndian, ReadBytesExt};

use crate::io::{ByteReader, Whence};
use crate::utf16::convert_utf16_le;
use crate::{Error, Result};

const PROP_HEADER_LEN: usize = 24;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PropertyEntry {
    pub(crate) name: String,
    pub(crate) value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct PropertyTable {
    pub(crate) entries: Vec<PropertyEntry>,
}

impl PropertyTable {
    /// Parse one `PROP` section at `offset`.
    pub(crate) fn read(reader: &ByteReader, offset: u32) -> Result<Self> {
        reader.seek(offset as i64, Whence::Start)?;
        let header = reader.read(PROP_HEADER_LEN)?;

        let count = (&header[8..12]).read_u32::<LittleEndian>()?;
        let length = (&header[20..24]).read_u32::<LittleEndian>()?;
        if length == 0 {
            return Err(Error::Range);
        }

        let index_bytes = reader.read(8 * count as usize)?;
        let pool = reader.read(length as usize)?;

        let mut entries = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let name_off = (&index_bytes[i * 8..i * 8 + 4]).read_u32::<LittleEndian>()? as usize;
            let val_off =
                (&index_bytes[i * 8 + 4..i * 8 + 8]).read_u32::<LittleEndian>()? as usize;

            if name_off > pool.len() || val_off > pool.len() {
                return Err(Error::Range);
            }

            let name = convert_utf16_le(&pool[name_off..])?;
            let value = convert_utf16_le(&pool[val_off..])?;

            entries.push(PropertyEntry { name, value });
        }

        Ok(PropertyTable { entries })
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn le16(s: &str) -> Vec<u8> {
        let mut v: Vec<u8> = s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        v.extend_from_slice(&[0, 0]);
        v
    }

    fn build_prop_section(pairs: &[(&str, &str)]) -> Vec<u8> {
        let mut pool = Vec::new();
        let mut offsets = Vec::new();
        for (name, value) in pairs {
            let name_off = pool.len() as u32;
            pool.extend_from_slice(&le16(name));
            let val_off = pool.len() as u32;
            pool.extend_from_slice(&le16(value));
            offsets.push((name_off, val_off));
        }

        let mut section = Vec::new();
        section.extend_from_slice(b"SECp");
        section.extend_from_slice(&1u32.to_le_bytes());
        section.extend_from_slice(&(pairs.len() as u32).to_le_bytes());
        section.extend_from_slice(&0u32.to_le_bytes()); // format
        section.extend_from_slice(&0u32.to_le_bytes()); // reserved
        section.extend_from_slice(&(pool.len() as u32).to_le_bytes());
        for (n, v) in &offsets {
            section.write_all(&n.to_le_bytes()).unwrap();
            section.write_all(&v.to_le_bytes()).unwrap();
        }
        section.extend_from_slice(&pool);
        section
    }

    #[test]
    fn test_read_entries() {
        let section = build_prop_section(&[("CAMMANUF", "Sigma"), ("WBType", "Auto")]);
        let reader = ByteReader::new(Box::new(std::io::Cursor::new(section)));
        let table = PropertyTable::read(&reader, 0).unwrap();
        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.get("CAMMANUF"), Some("Sigma"));
        assert_eq!(table.get("WBType"), Some("Auto"));
    }

    #[test]
    fn test_empty_string_value() {
        let section = build_prop_section(&[("Empty", "")]);
        let reader = ByteReader::new(Box::new(std::io::Cursor::new(section)));
        let table = PropertyTable::read(&reader, 0).unwrap();
        assert_eq!(table.get("Empty"), Some(""));
    }

    #[test]
    fn test_zero_length_pool_is_range_error() {
        let mut section = build_prop_section(&[("a", "b")]);
        section[20..24].copy_from_slice(&0u32.to_le_bytes());
        let reader = ByteReader::new(Box::new(std::io::Cursor::new(section)));
        assert_eq!(PropertyTable::read(&reader, 0), Err(Error::Range));
    }
}
