// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - file.rs
 */

use std::fs::File;
use std::path::Path;

use crate::camf::ElementType;
use crate::container::Container;
use crate::header::ExtendedAttribKind;
use crate::image::mode::ModeRegistry;
use crate::io::ByteReader;
use crate::{Error, Result};

/// One of the 32 extended-attribute slots carried in the fixed header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtendedAttrib {
    pub kind: ExtendedAttribKind,
    pub value: u32,
}

/// A parsed X3F file: the fixed header, its directory of sections, and
/// the decoders needed to pull pixel data out of any image section it
/// points at. Everything but pixel data itself is read eagerly at
/// `open` time, mirroring the reference's `x3f_open`; pixel decoding
/// is deferred to `read_image_data`.
pub struct X3fFile {
    reader: ByteReader,
    container: Container,
    modes: ModeRegistry,
}

impl X3fFile {
    /// Open and parse the header, directory, and every section header
    /// (property tables and CAMF metadata are fully decoded; image
    /// sections are only header-parsed, not decompressed).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|_| Error::BadFilename)?;
        Self::open_reader(file)
    }

    /// Open from any seekable byte source, for in-memory or test use.
    pub fn open_reader<T: std::io::Read + std::io::Seek + 'static>(source: T) -> Result<Self> {
        let reader = ByteReader::new(Box::new(source));
        let container = Container::open(&reader)?;
        Ok(X3fFile {
            reader,
            container,
            modes: ModeRegistry::with_default_modes(),
        })
    }

    /// The file format version as `(major, minor)`.
    pub fn get_ver(&self) -> (u16, u16) {
        (self.container.header.ver_major, self.container.header.ver_minor)
    }

    /// The header's nominal full-frame dimensions, `(columns, rows)`.
    pub fn get_dims(&self) -> (u32, u32) {
        (self.container.header.columns, self.container.header.rows)
    }

    /// The 16-byte camera identifier embedded in the header.
    pub fn get_id(&self) -> [u8; 16] {
        self.container.header.id
    }

    /// The 32-byte raw white-balance descriptor embedded in the header.
    pub fn get_white_balance(&self) -> [u8; 32] {
        self.container.header.white_balance
    }

    /// One of the header's 32 extended-attribute slots.
    pub fn get_extended_attrib(&self, index: usize) -> Result<ExtendedAttrib> {
        let slot = self.container.header.ext.get(index).ok_or(Error::Range)?;
        Ok(ExtendedAttrib {
            kind: slot.kind,
            value: slot.value,
        })
    }

    /// How many `IMAG`/`IMA2` sections this file's directory points at.
    pub fn get_subimage_count(&self) -> usize {
        self.container.images.len()
    }

    /// The `(columns, rows)` of the given image section.
    pub fn get_subimage_dims(&self, index: usize) -> Result<(u32, u32)> {
        let image = self.container.images.get(index).ok_or(Error::NotFound)?;
        Ok((image.cols, image.rows))
    }

    /// The only block size this image's decoder supports reading in
    /// one call: the whole frame.
    pub fn get_min_read_block(&self, index: usize) -> Result<(u32, u32)> {
        let image = self.container.images.get(index).ok_or(Error::NotFound)?;
        Ok(image.min_block())
    }

    /// Decode `(x, y, w, h)` of the given image section into
    /// interleaved 16-bit samples, `rows * cols * 3` long. Only
    /// full-frame reads (`x == 0 && y == 0 && w == cols && h == rows`)
    /// are supported; anything else is a `Range` error.
    pub fn read_image_data(
        &self,
        index: usize,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Result<Vec<u16>> {
        let image = self.container.images.get(index).ok_or(Error::NotFound)?;
        image.read_image_data(&self.reader, &self.modes, x, y, w, h)
    }

    /// A named `CAMF` array's element type, dimensions, and 32-bit
    /// values. Fails with `NotInitialized` if this file has no `CAMF`
    /// section, and `NotFound` if the section has no array with this
    /// name.
    pub fn get_array(&self, name: &str) -> Result<(ElementType, Vec<u32>, Vec<u32>)> {
        let camf = self.container.camf.as_ref().ok_or(Error::NotInitialized)?;
        let record = camf.get(name).ok_or(Error::NotFound)?;
        Ok((record.element_type, record.dim_lengths.clone(), record.as_u32_slice()))
    }

    /// A named `CAMF` array's element type and dimensions, without
    /// copying its values. Same lookup rules as `get_array`.
    pub fn query_array_attribs(&self, name: &str) -> Result<(ElementType, Vec<u32>)> {
        let camf = self.container.camf.as_ref().ok_or(Error::NotInitialized)?;
        let record = camf.get(name).ok_or(Error::NotFound)?;
        Ok((record.element_type, record.dim_lengths.clone()))
    }

    /// Look up a named property (e.g. `"CAMMANUF"`) across every
    /// `PROP` section this file's directory pointed at, first match
    /// wins.
    pub fn get_property(&self, name: &str) -> Option<&str> {
        self.container
            .properties
            .iter()
            .find_map(|table| table.get(name))
    }
}
