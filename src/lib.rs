//! A library for packing PNG images into multi-resolution ICO files.
//!
//! An ICO file is a small directory (the ICONDIR header followed by one
//! ICONDIRENTRY per image) and the images themselves.  This crate always
//! embeds each image as a 32-bit RGBA PNG, which every ICO reader since
//! Windows Vista understands.
//!
//! # Example
//!
//! ```no_run
//! let file = std::fs::File::open("logo.png").unwrap();
//! let mut source = icopack::RgbaRasterizer::from_png(file).unwrap();
//! let sizes = icopack::recommended_sizes(source.width(), source.height());
//! let ico = icopack::build_icon(&mut source, &sizes).unwrap();
//! std::fs::write("favicon.ico", ico).unwrap();
//! ```
//!
//! # Errors
//!
//! Failures are reported as `std::io::Error`.  Caller mistakes (an empty
//! image list, a size outside 1 to 256) use `ErrorKind::InvalidInput`;
//! payloads that don't match what they claim to be use
//! `ErrorKind::InvalidData`.

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod icondir;
mod payload;
mod policy;
mod raster;
mod size;

pub use crate::icondir::{IconDirectory, ENTRY_LEN, HEADER_LEN};
pub use crate::payload::IconImage;
pub use crate::policy::{
    recommended_sizes, SizePreset, CANONICAL_SIZES, FALLBACK_SIZE,
};
pub use crate::raster::{
    build_icon, from_fn, Filter, FromFn, Memoized, Rasterizer, RgbaRasterizer,
};
pub use crate::size::IconSize;

use std::io;

//===========================================================================//

/// The MIME type to use when offering an ICO file for download.
pub const MIME_TYPE: &str = "image/x-icon";

/// Encodes a non-empty list of images into an ICO file, in the given order.
///
/// Returns an `ErrorKind::InvalidInput` error if `images` is empty, or an
/// `ErrorKind::InvalidData` error if any image's declared byte length doesn't
/// match its payload.
pub fn encode(images: Vec<IconImage>) -> io::Result<Vec<u8>> {
    IconDirectory::new(images)?.encode()
}

//===========================================================================//


//===========================================================================//
