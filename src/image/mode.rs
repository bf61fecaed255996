// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - image/mode.rs
 */

use once_cell::unsync::OnceCell;

use crate::io::ByteReader;
use crate::{Error, Result};

use super::mode30::Mode30State;

/// One registered image decoder. The reference implementation keeps
/// modes in a process-wide list populated at init; here each file
/// handle owns its own registry, built once at open time, so there is
/// no global init-order dependency.
pub(crate) trait ImageMode {
    fn type_id(&self) -> u32;

    /// Parse the mode-specific header at `image_offset` and cache any
    /// state needed to read pixels later.
    fn setup(&self, reader: &ByteReader, image_offset: u64) -> Result<ModeState>;

    /// Decode the full frame into `rows * cols * 3` 16-bit samples.
    fn read_image(
        &self,
        reader: &ByteReader,
        state: &ModeState,
        cols: u32,
        rows: u32,
    ) -> Result<Vec<u16>>;

    /// The only block size this mode supports reading: the whole frame.
    fn min_block(&self, cols: u32, rows: u32) -> (u32, u32) {
        (cols, rows)
    }
}

pub(crate) enum ModeState {
    Mode30(Mode30State),
}

/// Registry of available image modes, owned by the file handle rather
/// than a process-wide singleton.
pub(crate) struct ModeRegistry {
    modes: Vec<Box<dyn ImageMode>>,
}

impl ModeRegistry {
    pub(crate) fn with_default_modes() -> Self {
        let mut registry = ModeRegistry { modes: Vec::new() };
        registry.register(Box::new(super::mode30::Mode30));
        registry
    }

    pub(crate) fn register(&mut self, mode: Box<dyn ImageMode>) {
        self.modes.push(mode);
    }

    pub(crate) fn get(&self, type_id: u32) -> Result<&dyn ImageMode> {
        self.modes
            .iter()
            .find(|m| m.type_id() == type_id)
            .map(|m| m.as_ref())
            .ok_or(Error::UnsupportedMode)
    }
}

/// Per-descriptor lazily-initialized mode state: the mode-specific
/// header is only parsed the first time pixel data is actually read.
#[derive(Default)]
pub(crate) struct ImageDescriptorState {
    pub(crate) state: OnceCell<ModeState>,
}
