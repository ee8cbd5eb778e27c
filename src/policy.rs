use crate::size::IconSize;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;

//===========================================================================//

/// The resolutions that [`recommended_sizes`](fn.recommended_sizes.html)
/// chooses from, smallest first.
pub const CANONICAL_SIZES: &[IconSize] = &[
    IconSize::square_unchecked(16),
    IconSize::square_unchecked(32),
    IconSize::square_unchecked(48),
    IconSize::square_unchecked(64),
    IconSize::square_unchecked(128),
    IconSize::square_unchecked(256),
];

/// The single size used when a source is smaller than every canonical size.
pub const FALLBACK_SIZE: IconSize = IconSize::square_unchecked(32);

const WINDOWS_SIZES: &[IconSize] = &[
    IconSize::square_unchecked(16),
    IconSize::square_unchecked(24),
    IconSize::square_unchecked(32),
    IconSize::square_unchecked(48),
    IconSize::square_unchecked(64),
    IconSize::square_unchecked(128),
    IconSize::square_unchecked(256),
];

const FAVICON_SIZES: &[IconSize] = &[
    IconSize::square_unchecked(16),
    IconSize::square_unchecked(32),
    IconSize::square_unchecked(48),
];

//===========================================================================//

/// Returns the canonical icon sizes that don't exceed the larger dimension
/// of the source image, smallest first.
///
/// Scaling a source up past its native resolution gives a blurry icon, so
/// those sizes are left out.  If nothing survives (the source is smaller
/// than 16 pixels on both axes), a single 32x32 entry is returned instead,
/// so the result is never empty.
///
/// This is only a recommendation; the encoder will accept any list of sizes.
pub fn recommended_sizes(source_width: u32, source_height: u32) -> Vec<IconSize> {
    let limit = source_width.max(source_height);
    let sizes: Vec<IconSize> = CANONICAL_SIZES
        .iter()
        .copied()
        .filter(|size| size.width().max(size.height()) <= limit)
        .collect();
    if sizes.is_empty() {
        log::debug!(
            "No canonical icon size fits a {}x{} source; using {}",
            source_width,
            source_height,
            FALLBACK_SIZE
        );
        return vec![FALLBACK_SIZE];
    }
    sizes
}

//===========================================================================//

/// A fixed set of icon sizes, chosen regardless of the source resolution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SizePreset {
    /// The sizes used by the Windows shell: 16, 24, 32, 48, 64, 128 and 256.
    Windows,
    /// The sizes browsers look for in `favicon.ico`: 16, 32 and 48.
    Favicon,
    /// The full canonical list: 16, 32, 48, 64, 128 and 256.
    Canonical,
}

impl SizePreset {
    /// All presets, in the order they are listed to users.
    pub const ALL: &'static [SizePreset] =
        &[SizePreset::Windows, SizePreset::Favicon, SizePreset::Canonical];

    /// Returns the sizes in this preset, smallest first.
    pub fn sizes(&self) -> &'static [IconSize] {
        match *self {
            SizePreset::Windows => WINDOWS_SIZES,
            SizePreset::Favicon => FAVICON_SIZES,
            SizePreset::Canonical => CANONICAL_SIZES,
        }
    }

    /// Returns the lowercase name of this preset.
    pub fn name(&self) -> &'static str {
        match *self {
            SizePreset::Windows => "windows",
            SizePreset::Favicon => "favicon",
            SizePreset::Canonical => "canonical",
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for SizePreset {
    type Err = io::Error;

    fn from_str(name: &str) -> io::Result<SizePreset> {
        for &preset in SizePreset::ALL {
            if preset.name().eq_ignore_ascii_case(name) {
                return Ok(preset);
            }
        }
        invalid_input!("Unknown size preset: {:?}", name);
    }
}

//===========================================================================//


//===========================================================================//
