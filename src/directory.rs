// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - directory.rs
 */

use byteorder::{LittleEndian, ReadBytesExt};

use crate::io::{ByteReader, Whence};
use crate::{Error, Result};

pub(crate) const TAG_DIR: &[u8; 4] = b"SECd";
pub(crate) const TAG_IMAG: &[u8; 4] = b"IMAG";
pub(crate) const TAG_IMA2: &[u8; 4] = b"IMA2";
pub(crate) const TAG_PROP: &[u8; 4] = b"PROP";
pub(crate) const TAG_CAMF: &[u8; 4] = b"CAMF";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DirectoryEntry {
    pub(crate) offset: u32,
    pub(crate) length: u32,
    pub(crate) tag: [u8; 4],
}

impl DirectoryEntry {
    pub(crate) fn is_image(&self) -> bool {
        &self.tag == TAG_IMAG || &self.tag == TAG_IMA2
    }

    pub(crate) fn is_prop(&self) -> bool {
        &self.tag == TAG_PROP
    }

    pub(crate) fn is_camf(&self) -> bool {
        &self.tag == TAG_CAMF
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Directory {
    pub(crate) version: u32,
    pub(crate) entries: Vec<DirectoryEntry>,
}

impl Directory {
    /// Follow the trailer offset and parse the `SECd` directory.
    pub(crate) fn read(reader: &ByteReader) -> Result<Self> {
        let file_len = reader.len()?;
        if file_len < 4 {
            return Err(Error::NotX3F);
        }
        reader.seek(-4, Whence::End)?;
        let dir_offset = u32::from_le_bytes(reader.read(4)?.try_into().unwrap());

        reader.seek(dir_offset as i64, Whence::Start)?;

        let tag = reader.read(4)?;
        if tag.as_slice() != TAG_DIR {
            log::warn!("directory magic mismatch at offset {dir_offset}");
            return Err(Error::NotX3F);
        }

        let mut cursor = reader.read(8)?;
        let version = (&cursor[0..4]).read_u32::<LittleEndian>()?;
        let count = (&cursor[4..8]).read_u32::<LittleEndian>()?;
        cursor.clear();

        if count == 0 {
            return Err(Error::Range);
        }

        log::debug!("directory at {dir_offset:#x} has {count} entries");

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let raw = reader.read(12)?;
            let offset = (&raw[0..4]).read_u32::<LittleEndian>()?;
            let length = (&raw[4..8]).read_u32::<LittleEndian>()?;
            let mut tag = [0u8; 4];
            tag.copy_from_slice(&raw[8..12]);

            if (offset as u64).saturating_add(length as u64) > file_len {
                return Err(Error::Range);
            }

            entries.push(DirectoryEntry {
                offset,
                length,
                tag,
            });
        }

        Ok(Directory { version, entries })
    }
}
