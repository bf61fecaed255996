// SPDX-License-Identifier: LGPL-3.0-or-later
/*
 * x3f - lib.rs
 *
 * Copyright (C) 2024 The x3f authors
 *
 * This library is free software: you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public License
 * as published by the Free Software Foundation, either version 3 of
 * the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library.  If not, see
 * <http://www.gnu.org/licenses/>.
 */

//! Read Sigma/Foveon X3F camera raw files: directory and header
//! parsing, CAMF metadata decryption, and Huffman decompression of
//! mode-30 planar image data.

mod bits;
mod camf;
mod container;
pub mod dump;
mod file;
mod header;
mod huffman;
mod image;
mod io;
mod property;
mod utf16;

pub(crate) mod directory;

pub use camf::ElementType;
pub use file::{ExtendedAttrib, X3fFile};
pub use header::ExtendedAttribKind;

/// Standard Result for x3f
pub type Result<T> = std::result::Result<T, Error>;

/// Standard Error for x3f
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The filename is empty, invalid, or could not be opened
    BadFilename,
    /// An allocation was refused because the declared size was absurd
    NoMemory,
    /// An argument was null or otherwise invalid
    BadArg,
    /// The file is not a recognizable X3F container
    NotX3F,
    /// A seek or read against the underlying file failed
    CantSeek(String),
    /// An index, offset or declared size falls outside its bounds
    Range,
    /// No decoder is registered for this image format
    UnsupportedMode,
    /// The requested name or entry does not exist
    NotFound,
    /// The component queried has not been parsed for this file
    NotInitialized,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::CantSeek(err.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::BadFilename => write!(f, "Bad filename"),
            Self::NoMemory => write!(f, "Allocation refused"),
            Self::BadArg => write!(f, "Bad argument"),
            Self::NotX3F => write!(f, "Not an X3F file"),
            Self::CantSeek(ref err) => write!(f, "I/O error: {}", err),
            Self::Range => write!(f, "Value out of range"),
            Self::UnsupportedMode => write!(f, "Unsupported image mode"),
            Self::NotFound => write!(f, "Not found"),
            Self::NotInitialized => write!(f, "Not initialized"),
        }
    }
}

impl std::error::Error for Error {}
