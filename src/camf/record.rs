// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - camf/record.rs
 */

use std::collections::HashMap;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{Error, Result};

const CMB_HEADER_LEN: usize = 20;

/// The type tag on a `CMbM` array element. Only the 32-bit scalar type
/// the reference decoder supports (`3`) is modeled; any other
/// declared type is a parse-time `Range` error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    U32,
}

impl ElementType {
    fn from_raw(raw: u32) -> Result<(Self, usize)> {
        match raw {
            3 => Ok((ElementType::U32, 4)),
            _ => Err(Error::Range),
        }
    }
}

/// One parsed `CMbM` matrix record: its element type, dimensions, and
/// raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ArrayRecord {
    pub(crate) element_type: ElementType,
    pub(crate) dim_lengths: Vec<u32>,
    pub(crate) bytes: Vec<u8>,
}

impl ArrayRecord {
    pub(crate) fn as_u32_slice(&self) -> Vec<u32> {
        self.bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }
}

/// Insertion-ordered name -> array map. The reference implementation's
/// "metatree" is actually an append-only linear list, so this mirrors
/// that with a `Vec` plus a `HashMap` index rather than a real
/// balanced tree or an external ordered-map crate: first insertion of
/// a name wins, and iteration follows directory order.
#[derive(Default)]
pub(crate) struct ArrayMap {
    entries: Vec<(String, ArrayRecord)>,
    index: HashMap<String, usize>,
}

impl ArrayMap {
    fn insert(&mut self, name: String, record: ArrayRecord) {
        if self.index.contains_key(&name) {
            return;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, record));
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ArrayRecord> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }
}

/// Scan a decrypted CAMF payload for `CMb?` records, keeping only the
/// `CMbM` (matrix) kind; other record kinds are logged and skipped.
pub(crate) fn read_camf_records(data: &[u8]) -> Result<ArrayMap> {
    let mut map = ArrayMap::default();
    let mut cur = 0usize;

    while cur + 8 <= data.len() && &data[cur..cur + 3] == b"CMb" {
        let kind = data[cur + 3];
        let rec_length = (&data[cur + 8..cur + 12]).read_u32::<LittleEndian>()? as usize;
        let hdr_len = (&data[cur + 16..cur + 20]).read_u32::<LittleEndian>()? as usize;

        if cur + rec_length > data.len() {
            log::warn!("camf record at {cur} overruns buffer, likely corrupt");
            return Err(Error::Range);
        }

        if kind != b'M' {
            log::debug!("unsupported camf record kind {}", kind as char);
            cur += rec_length;
            continue;
        }

        if hdr_len < CMB_HEADER_LEN {
            return Err(Error::Range);
        }

        let record = &data[cur..cur + rec_length];
        let name_bytes = &record[CMB_HEADER_LEN..hdr_len];
        let name = String::from_utf8_lossy(
            &name_bytes[..name_bytes.iter().position(|&b| b == 0).unwrap_or(name_bytes.len())],
        )
        .into_owned();

        let body = &record[hdr_len..];
        if body.len() < 12 {
            return Err(Error::Range);
        }
        let raw_type = (&body[0..4]).read_u32::<LittleEndian>()?;
        let dimension = (&body[4..8]).read_u32::<LittleEndian>()?;
        let data_off = (&body[8..12]).read_u32::<LittleEndian>()? as usize;

        if data_off > rec_length {
            return Err(Error::Range);
        }
        if dimension > 3 {
            return Err(Error::Range);
        }

        let (element_type, elem_len) = ElementType::from_raw(raw_type)?;

        let mut dim_lengths = Vec::with_capacity(dimension as usize);
        let mut items: u64 = 1;
        for i in 0..dimension as usize {
            let off = 12 + i * 12;
            if body.len() < off + 4 {
                return Err(Error::Range);
            }
            let size = (&body[off..off + 4]).read_u32::<LittleEndian>()?;
            dim_lengths.push(size);
            items = items.saturating_mul(size as u64);
        }

        let byte_count = (items as usize)
            .checked_mul(elem_len)
            .ok_or(Error::NoMemory)?;
        if data_off + byte_count > record.len() {
            return Err(Error::Range);
        }
        let bytes = record[data_off..data_off + byte_count].to_vec();

        map.insert(
            name,
            ArrayRecord {
                element_type,
                dim_lengths,
                bytes,
            },
        );

        cur += rec_length;
    }

    Ok(map)
}

#[cfg(test)]
mod test {
    use super::*;

    fn build_cmbm_record(name: &str, dims: &[u32], values: &[u32]) -> Vec<u8> {
        let mut name_bytes = name.as_bytes().to_vec();
        name_bytes.push(0);
        // pad to a 4-byte boundary the way real files do, harmless either way
        while name_bytes.len() % 4 != 0 {
            name_bytes.push(0);
        }

        let hdr_len = (CMB_HEADER_LEN + name_bytes.len()) as u32;
        let body_header_len = 12 + dims.len() * 12;
        // data_off is measured from the start of the record, not the body.
        let data_off = hdr_len + body_header_len as u32;
        let data_bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let rec_length = data_off + data_bytes.len() as u32;

        let mut rec = Vec::new();
        rec.extend_from_slice(b"CMbM");
        rec.extend_from_slice(&1u16.to_le_bytes()); // ver_minor
        rec.extend_from_slice(&1u16.to_le_bytes()); // ver_major
        rec.extend_from_slice(&rec_length.to_le_bytes());
        rec.extend_from_slice(&0u32.to_le_bytes()); // unknown
        rec.extend_from_slice(&hdr_len.to_le_bytes());
        rec.extend_from_slice(&name_bytes);

        rec.extend_from_slice(&3u32.to_le_bytes()); // type == u32 scalar
        rec.extend_from_slice(&(dims.len() as u32).to_le_bytes());
        rec.extend_from_slice(&data_off.to_le_bytes());
        for d in dims {
            rec.extend_from_slice(&d.to_le_bytes()); // size
            rec.extend_from_slice(&0u32.to_le_bytes()); // desc_off
            rec.extend_from_slice(&1u32.to_le_bytes()); // stride
        }
        rec.extend_from_slice(&data_bytes);
        rec
    }

    #[test]
    fn test_lookup_matrix() {
        let values: Vec<u32> = (1..=9).collect();
        let data = build_cmbm_record("CP2_Matrix", &[3, 3], &values);
        let map = read_camf_records(&data).unwrap();
        let rec = map.get("CP2_Matrix").unwrap();
        assert_eq!(rec.dim_lengths, vec![3, 3]);
        assert_eq!(rec.bytes.len(), 36);
        assert_eq!(rec.as_u32_slice(), values);
    }

    #[test]
    fn test_unknown_record_kind_is_skipped() {
        let mut data = build_cmbm_record("A", &[1], &[42]);
        data[3] = b'X'; // not a matrix record
        let map = read_camf_records(&data).unwrap();
        assert!(map.get("A").is_none());
    }

    #[test]
    fn test_first_insertion_wins_on_name_collision() {
        let mut data = build_cmbm_record("Dup", &[1], &[1]);
        data.extend(build_cmbm_record("Dup", &[1], &[2]));
        let map = read_camf_records(&data).unwrap();
        assert_eq!(map.get("Dup").unwrap().as_u32_slice(), vec![1]);
    }

    #[test]
    fn test_data_off_past_rec_length_is_range_error() {
        let mut data = build_cmbm_record("Bad", &[1], &[1]);
        // corrupt data_off (located right after hdr_len's name block + 8 bytes of type/dim)
        let hdr_len = (&data[16..20]).read_u32::<LittleEndian>().unwrap() as usize;
        data[hdr_len + 8..hdr_len + 12].copy_from_slice(&0xffff_ffffu32.to_le_bytes());
        assert_eq!(read_camf_records(&data), Err(Error::Range));
    }
}
