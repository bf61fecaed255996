// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - io.rs
 */

use std::cell::RefCell;
use std::io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// Anything we can read an X3F container out of.
pub(crate) trait ReadAndSeek: Read + Seek {}
impl<T: Read + Seek> ReadAndSeek for T {}

/// Where a `seek` is relative to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Whence {
    Start,
    Current,
    End,
}

/// Wraps the file-like source so every component shares one I/O
/// handle without fighting the borrow checker. Mirrors the single-file
/// case of a `Viewer`: X3F has no nested containers, so there is never
/// more than one view.
pub(crate) struct ByteReader {
    inner: RefCell<Box<dyn ReadAndSeek>>,
}

impl ByteReader {
    pub(crate) fn new(inner: Box<dyn ReadAndSeek>) -> Self {
        ByteReader {
            inner: RefCell::new(inner),
        }
    }

    pub(crate) fn seek(&self, offset: i64, whence: Whence) -> Result<u64> {
        let pos = match whence {
            Whence::Start => SeekFrom::Start(offset as u64),
            Whence::Current => SeekFrom::Current(offset),
            Whence::End => SeekFrom::End(offset),
        };
        self.inner
            .borrow_mut()
            .seek(pos)
            .map_err(|e| Error::CantSeek(e.to_string()))
    }

    pub(crate) fn tell(&self) -> Result<u64> {
        self.inner
            .borrow_mut()
            .stream_position()
            .map_err(|e| Error::CantSeek(e.to_string()))
    }

    pub(crate) fn read(&self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner
            .borrow_mut()
            .read_exact(&mut buf)
            .map_err(|e| Error::CantSeek(e.to_string()))?;
        Ok(buf)
    }

    pub(crate) fn len(&self) -> Result<u64> {
        let cur = self.tell()?;
        let end = self.seek(0, Whence::End)?;
        self.seek(cur as i64, Whence::Start)?;
        Ok(end)
    }
}
