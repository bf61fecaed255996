// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - image/mode30.rs
 */

use byteorder::{LittleEndian, ReadBytesExt};

use crate::bits::BitIterator;
use crate::huffman::HuffmanTree;
use crate::io::{ByteReader, Whence};
use crate::{Error, Result};

use super::mode::{ImageMode, ModeState};

/// State captured at `setup` time for mode 30: the four predictor
/// seeds, the shared Huffman tree, and the file offset where the
/// three encoded planes begin.
pub(crate) struct Mode30State {
    predictor: [u16; 4],
    tree: HuffmanTree,
    plane_size: [u32; 3],
    start_offset: u64,
}

/// Special Huffman compression, 1024-entry table, 2x2 predictor seeds.
pub(crate) struct Mode30;

impl ImageMode for Mode30 {
    fn type_id(&self) -> u32 {
        30
    }

    fn setup(&self, reader: &ByteReader, image_offset: u64) -> Result<ModeState> {
        reader.seek(image_offset as i64, Whence::Start)?;
        let header = reader.read(8)?;
        let predictor = [
            (&header[0..2]).read_u16::<LittleEndian>()?,
            (&header[2..4]).read_u16::<LittleEndian>()?,
            (&header[4..6]).read_u16::<LittleEndian>()?,
            (&header[6..8]).read_u16::<LittleEndian>()?,
        ];

        let mut tree = HuffmanTree::new();
        let mut entry = 0u32;
        loop {
            let pair = reader.read(2)?;
            let size = pair[0] as u32;
            let value = pair[1] as u32;
            tree.append(size, value, entry);
            entry += 1;
            if size == 0 {
                break;
            }
        }

        let mut plane_size = [0u32; 3];
        for slot in plane_size.iter_mut() {
            *slot = u32::from_le_bytes(reader.read(4)?.try_into().unwrap());
        }

        let start_offset = reader.tell()?;

        Ok(ModeState::Mode30(Mode30State {
            predictor,
            tree,
            plane_size,
            start_offset,
        }))
    }

    fn read_image(
        &self,
        reader: &ByteReader,
        state: &ModeState,
        cols: u32,
        rows: u32,
    ) -> Result<Vec<u16>> {
        let ModeState::Mode30(state) = state;
        reader.seek(state.start_offset as i64, Whence::Start)?;

        let mut out = vec![0u16; rows as usize * cols as usize * 3];

        for plane in 0..3 {
            let padded = ((state.plane_size[plane] as usize + 15) / 16) * 16;
            let encoded = reader.read(padded)?;
            let decoded = decode_plane(
                &state.tree,
                state.predictor[plane],
                &encoded,
                rows,
                cols,
            )?;
            let base = plane * rows as usize * cols as usize;
            out[base..base + decoded.len()].copy_from_slice(&decoded);
        }

        Ok(out)
    }
}

/// Decode one Huffman-coded, 2x2-predicted plane into `rows * cols`
/// byte-swapped 16-bit samples.
fn decode_plane(
    tree: &HuffmanTree,
    predictor: u16,
    encoded: &[u8],
    rows: u32,
    cols: u32,
) -> Result<Vec<u16>> {
    let mut bits = BitIterator::new(encoded.to_vec());
    let mut row_begin = [[predictor as i32; 2]; 2];
    let mut out = vec![0u16; rows as usize * cols as usize];
    let mut cur = 0usize;

    for row in 0..rows {
        let mut val = [0i32; 2];
        for col in 0..cols {
            let pr = (row & 1) as usize;
            let pc = (col & 1) as usize;
            let old = if col < 2 {
                row_begin[pr][pc]
            } else {
                val[pc]
            };

            let residual = tree.decode_symbol(&mut bits).unwrap_or_else(|_| {
                log::debug!("mode30 decode ran out of bits at row {row}, col {col}");
                0
            });

            let new_val = old + residual;
            val[pc] = new_val;
            if col < 2 {
                row_begin[pr][pc] = new_val;
            }

            let raw = new_val as u16;
            out[cur] = ((raw >> 8) & 0xff) | ((raw & 0xff) << 8);
            cur += 1;
        }
    }

    if cur != out.len() {
        return Err(Error::Range);
    }

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_plane_signature() {
        let mut tree = HuffmanTree::new();
        tree.append(1, 0x80, 0); // every symbol decodes to residual 0
        tree.append(0, 0, 1);
        let encoded = vec![0u8; 64];
        let out = decode_plane(&tree, 100, &encoded, 4, 4).unwrap();
        assert_eq!(out.len(), 16);
        // predictor 100 never changes: high byte of 100 is 0, low byte 100 ->
        // byte-swapped sample has high byte 100 after the swap.
        assert_eq!(out[0] >> 8, 100);
    }
}
