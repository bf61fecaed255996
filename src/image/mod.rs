// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - image/mod.rs
 */

pub(crate) mod mode;
mod mode30;

use crate::io::ByteReader;
use crate::{Error, Result};

use mode::{ImageDescriptorState, ModeRegistry};

pub(crate) const IMAGE_HEADER_LEN: usize = 28;
pub(crate) const IMAGE_SECTION_MAGIC: &[u8; 4] = b"SECi";

/// One parsed `IMAG`/`IMA2` section header.
pub(crate) struct ImageDescriptor {
    pub(crate) ver_major: u16,
    pub(crate) ver_minor: u16,
    pub(crate) image_type: u32,
    pub(crate) format: u32,
    pub(crate) cols: u32,
    pub(crate) rows: u32,
    pub(crate) row_bytes: u32,
    pub(crate) image_offset: u64,
    state: ImageDescriptorState,
}

impl ImageDescriptor {
    pub(crate) fn read(reader: &ByteReader, dir_offset: u32) -> Result<Self> {
        use crate::io::Whence;
        use byteorder::{LittleEndian, ReadBytesExt};

        reader.seek(dir_offset as i64, Whence::Start)?;
        let header = reader.read(IMAGE_HEADER_LEN)?;

        if &header[0..4] != IMAGE_SECTION_MAGIC {
            log::warn!("image section at {dir_offset:#x} is missing its SECi magic");
            return Err(Error::NotX3F);
        }

        let version = (&header[4..8]).read_u32::<LittleEndian>()?;
        let image_type = (&header[8..12]).read_u32::<LittleEndian>()?;
        let format = (&header[12..16]).read_u32::<LittleEndian>()?;
        let cols = (&header[16..20]).read_u32::<LittleEndian>()?;
        let rows = (&header[20..24]).read_u32::<LittleEndian>()?;
        let row_bytes = (&header[24..28]).read_u32::<LittleEndian>()?;

        Ok(ImageDescriptor {
            ver_major: (version >> 16) as u16,
            ver_minor: (version & 0xffff) as u16,
            image_type,
            format,
            cols,
            rows,
            row_bytes,
            image_offset: dir_offset as u64 + IMAGE_HEADER_LEN as u64,
            state: ImageDescriptorState::default(),
        })
    }

    /// `min_block`: the one block size this format actually supports
    /// reading, `(cols, rows)` in that order (the reference
    /// implementation's width/height pointers are swapped; this is
    /// not reproduced).
    pub(crate) fn min_block(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    pub(crate) fn read_image_data(
        &self,
        reader: &ByteReader,
        registry: &ModeRegistry,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Result<Vec<u16>> {
        if x != 0 || y != 0 || w != self.cols || h != self.rows {
            return Err(Error::Range);
        }

        let mode = registry.get(self.format)?;
        let state = self
            .state
            .state
            .get_or_try_init(|| mode.setup(reader, self.image_offset))?;
        mode.read_image(reader, state, self.cols, self.rows)
    }
}
