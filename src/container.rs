// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - container.rs
 */

use crate::camf::CamfContext;
use crate::directory::Directory;
use crate::header::Header;
use crate::image::ImageDescriptor;
use crate::io::{ByteReader, Whence};
use crate::property::PropertyTable;
use crate::Result;

/// Everything recovered by walking the directory once at open time:
/// the fixed header plus one parsed descriptor per section the
/// directory pointed at. Mirrors the reference's `x3f_open`, which
/// reads the header, follows the trailer to the directory, then reads
/// every section header (but not yet any section's payload).
pub(crate) struct Container {
    pub(crate) header: Header,
    pub(crate) directory: Directory,
    pub(crate) images: Vec<ImageDescriptor>,
    pub(crate) properties: Vec<PropertyTable>,
    pub(crate) camf: Option<CamfContext>,
}

impl Container {
    pub(crate) fn open(reader: &ByteReader) -> Result<Self> {
        reader.seek(0, Whence::Start)?;
        let header_bytes = reader.read(crate::header::FULL_HEADER_LEN)?;
        let header = Header::parse(&header_bytes)?;

        let directory = Directory::read(reader)?;

        let mut images = Vec::new();
        let mut properties = Vec::new();
        let mut camf = None;

        for entry in &directory.entries {
            if entry.is_image() {
                images.push(ImageDescriptor::read(reader, entry.offset)?);
            } else if entry.is_prop() {
                properties.push(PropertyTable::read(reader, entry.offset)?);
            } else if entry.is_camf() {
                camf = Some(CamfContext::read(reader, entry.offset, entry.length)?);
            } else {
                log::warn!(
                    "skipping directory entry with unrecognized tag {:?} at {:#x}",
                    String::from_utf8_lossy(&entry.tag),
                    entry.offset
                );
            }
        }

        Ok(Container {
            header,
            directory,
            images,
            properties,
            camf,
        })
    }
}
