// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - header.rs
 */

use byteorder::{LittleEndian, ReadBytesExt};
use lazy_static::lazy_static;

use crate::{Error, Result};

pub(crate) const MAGIC: &[u8; 4] = b"FOVb";

const HEADER_ID_OFFSET: usize = 8;
const HEADER_MARK_OFFSET: usize = 24;
const HEADER_COLUMNS_OFFSET: usize = 28;
const HEADER_ROWS_OFFSET: usize = 32;
const HEADER_ROTATION_OFFSET: usize = 36;
const HEADER_WHITEBAL_OFFSET: usize = 40;
const HEADER_EXTENDED_TYPES_OFFSET: usize = 104;
const HEADER_EXTENDED_DATA_OFFSET: usize = 136;
const EXTENDED_ATTRIB_COUNT: usize = 32;

/// Bytes actually needed to hold every extended-attribute value: the
/// reference declares a 256-byte header buffer but then indexes 32
/// little-endian u32 values starting at byte 136, i.e. up to byte 264
/// — 8 bytes past its own declared buffer. Reproducing that would be
/// an out-of-bounds read; this reads the true extent instead.
pub(crate) const FULL_HEADER_LEN: usize =
    HEADER_EXTENDED_DATA_OFFSET + EXTENDED_ATTRIB_COUNT * 4;

lazy_static! {
    /// Names for the first eleven extended-attribute kinds; anything
    /// beyond this range is reported generically.
    static ref ATTRIB_NAMES: [&'static str; 11] = [
        "Unused",
        "Exposure adjust",
        "Contrast adjust",
        "Shadow adjust",
        "Highlight adjust",
        "Saturation adjust",
        "Sharpness adjust",
        "Color adjust red",
        "Color adjust green",
        "Color adjust blue",
        "X3 Fill Light adjust",
    ];
}

/// Named kind of an extended-attribute slot in the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtendedAttribKind {
    Unused,
    Exposure,
    Contrast,
    Shadow,
    Highlight,
    Saturation,
    Sharpness,
    ColorRed,
    ColorGreen,
    ColorBlue,
    FillLight,
    Unknown(u8),
}

impl ExtendedAttribKind {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Unused,
            1 => Self::Exposure,
            2 => Self::Contrast,
            3 => Self::Shadow,
            4 => Self::Highlight,
            5 => Self::Saturation,
            6 => Self::Sharpness,
            7 => Self::ColorRed,
            8 => Self::ColorGreen,
            9 => Self::ColorBlue,
            10 => Self::FillLight,
            other => Self::Unknown(other),
        }
    }

    /// Human-readable name, as surfaced by `x3finfo`.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::Unused => ATTRIB_NAMES[0],
            Self::Exposure => ATTRIB_NAMES[1],
            Self::Contrast => ATTRIB_NAMES[2],
            Self::Shadow => ATTRIB_NAMES[3],
            Self::Highlight => ATTRIB_NAMES[4],
            Self::Saturation => ATTRIB_NAMES[5],
            Self::Sharpness => ATTRIB_NAMES[6],
            Self::ColorRed => ATTRIB_NAMES[7],
            Self::ColorGreen => ATTRIB_NAMES[8],
            Self::ColorBlue => ATTRIB_NAMES[9],
            Self::FillLight => ATTRIB_NAMES[10],
            Self::Unknown(_) => "Invalid attribute",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ExtendedAttribSlot {
    pub(crate) kind: ExtendedAttribKind,
    pub(crate) value: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Header {
    pub(crate) ver_major: u16,
    pub(crate) ver_minor: u16,
    pub(crate) id: [u8; 16],
    pub(crate) mark: u32,
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) rotation: u32,
    pub(crate) white_balance: [u8; 32],
    pub(crate) ext: [ExtendedAttribSlot; EXTENDED_ATTRIB_COUNT],
}

impl Header {
    /// Parse the fixed header block. `buf` must be at least
    /// `FULL_HEADER_LEN` bytes, already read from offset 0.
    pub(crate) fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < FULL_HEADER_LEN {
            return Err(Error::Range);
        }
        if &buf[0..4] != MAGIC {
            return Err(Error::NotX3F);
        }

        let mut cursor = &buf[4..];
        let ver_minor = cursor.read_u16::<LittleEndian>()?;
        let ver_major = cursor.read_u16::<LittleEndian>()?;

        let mut id = [0u8; 16];
        id.copy_from_slice(&buf[HEADER_ID_OFFSET..HEADER_ID_OFFSET + 16]);

        let mark = (&buf[HEADER_MARK_OFFSET..]).read_u32::<LittleEndian>()?;
        let columns = (&buf[HEADER_COLUMNS_OFFSET..]).read_u32::<LittleEndian>()?;
        let rows = (&buf[HEADER_ROWS_OFFSET..]).read_u32::<LittleEndian>()?;
        let rotation = (&buf[HEADER_ROTATION_OFFSET..]).read_u32::<LittleEndian>()?;

        let mut white_balance = [0u8; 32];
        white_balance.copy_from_slice(&buf[HEADER_WHITEBAL_OFFSET..HEADER_WHITEBAL_OFFSET + 32]);

        let types = &buf[HEADER_EXTENDED_TYPES_OFFSET..HEADER_EXTENDED_TYPES_OFFSET + EXTENDED_ATTRIB_COUNT];
        let mut ext = [ExtendedAttribSlot {
            kind: ExtendedAttribKind::Unused,
            value: 0,
        }; EXTENDED_ATTRIB_COUNT];
        for i in 0..EXTENDED_ATTRIB_COUNT {
            let value_off = HEADER_EXTENDED_DATA_OFFSET + i * 4;
            let value = (&buf[value_off..]).read_u32::<LittleEndian>()?;
            ext[i] = ExtendedAttribSlot {
                kind: ExtendedAttribKind::from_raw(types[i]),
                value,
            };
        }

        Ok(Header {
            ver_major,
            ver_minor,
            id,
            mark,
            columns,
            rows,
            rotation,
            white_balance,
            ext,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn make_header_bytes() -> Vec<u8> {
        let mut buf = vec![0u8; FULL_HEADER_LEN];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4..6].copy_from_slice(&1u16.to_le_bytes());
        buf[6..8].copy_from_slice(&2u16.to_le_bytes());
        buf[HEADER_ID_OFFSET..HEADER_ID_OFFSET + 16].copy_from_slice(&[0xAB; 16]);
        buf[HEADER_COLUMNS_OFFSET..HEADER_COLUMNS_OFFSET + 4]
            .copy_from_slice(&2640u32.to_le_bytes());
        buf[HEADER_ROWS_OFFSET..HEADER_ROWS_OFFSET + 4].copy_from_slice(&1760u32.to_le_bytes());
        buf
    }

    #[test]
    fn test_header_round_trip() {
        let buf = make_header_bytes();
        let header = Header::parse(&buf).unwrap();
        assert_eq!(header.ver_major, 2);
        assert_eq!(header.ver_minor, 1);
        assert_eq!(header.columns, 2640);
        assert_eq!(header.rows, 1760);
        assert_eq!(header.id, [0xAB; 16]);
    }

    #[test]
    fn test_bad_magic_is_not_x3f() {
        let mut buf = make_header_bytes();
        buf[0] = b'X';
        assert_eq!(Header::parse(&buf), Err(Error::NotX3F));
    }

    #[test]
    fn test_attrib_names() {
        assert_eq!(ExtendedAttribKind::from_raw(0).name(), "Unused");
        assert_eq!(ExtendedAttribKind::from_raw(10).name(), "X3 Fill Light adjust");
        assert_eq!(ExtendedAttribKind::from_raw(200).name(), "Invalid attribute");
    }
}
