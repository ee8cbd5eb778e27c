#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

//===========================================================================//

// Size limits for images in an ICO file:
pub(crate) const MIN_DIMENSION: u32 = 1;
pub(crate) const MAX_DIMENSION: u32 = 256;

//===========================================================================//

/// The pixel dimensions of one image in an ICO file.
///
/// Both dimensions are in the range 1 to 256 inclusive.  Icons are almost
/// always square, but nothing here requires that.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconSize {
    width: u32,
    height: u32,
}

impl IconSize {
    /// Creates a new size.  Returns an error if either dimension is outside
    /// the range 1 to 256.
    pub fn new(width: u32, height: u32) -> io::Result<IconSize> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&width) {
            invalid_input!(
                "Invalid icon width (was {}, but must be between {} and {})",
                width,
                MIN_DIMENSION,
                MAX_DIMENSION
            );
        }
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&height) {
            invalid_input!(
                "Invalid icon height (was {}, but must be between {} and {})",
                height,
                MIN_DIMENSION,
                MAX_DIMENSION
            );
        }
        Ok(IconSize { width, height })
    }

    /// Creates a new square size.  Returns an error if `side` is outside the
    /// range 1 to 256.
    pub fn square(side: u32) -> io::Result<IconSize> {
        IconSize::new(side, side)
    }

    // Only for compile-time tables whose values are known to be in range.
    pub(crate) const fn square_unchecked(side: u32) -> IconSize {
        IconSize { width: side, height: side }
    }

    /// Returns the width, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the width and height are equal.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns the number of pixels covered by this size.
    pub fn num_pixels(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// The width as stored in an ICONDIRENTRY.
    pub(crate) fn width_byte(&self) -> u8 {
        dimension_to_byte(self.width)
    }

    /// The height as stored in an ICONDIRENTRY.
    pub(crate) fn height_byte(&self) -> u8 {
        dimension_to_byte(self.height)
    }

    /// Rebuilds a size from the width/height bytes of an ICONDIRENTRY.
    pub(crate) fn from_bytes(width_byte: u8, height_byte: u8) -> IconSize {
        IconSize {
            width: byte_to_dimension(width_byte),
            height: byte_to_dimension(height_byte),
        }
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}x{}", self.width, self.height)
    }
}

//===========================================================================//

// A single byte can't hold 256, so the format stores it as zero.
fn dimension_to_byte(dimension: u32) -> u8 {
    debug_assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension));
    if dimension >= MAX_DIMENSION {
        0
    } else {
        dimension as u8
    }
}

fn byte_to_dimension(byte: u8) -> u32 {
    if byte == 0 {
        MAX_DIMENSION
    } else {
        byte as u32
    }
}

//===========================================================================//


//===========================================================================//
