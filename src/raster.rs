use crate::icondir::IconDirectory;
use crate::payload::{read_png_rgba, write_png_rgba, IconImage};
use crate::size::IconSize;
use image::imageops::{self, FilterType};
use image::RgbaImage;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

//===========================================================================//

/// Something that can render a source image at an exact pixel size.
///
/// Each call returns a standalone, owned PNG buffer whose decoded size is
/// exactly `size` and whose pixels are 32-bit RGBA.
pub trait Rasterizer {
    /// Renders the source image at `size` and encodes it as PNG.
    fn rasterize(&mut self, size: IconSize) -> io::Result<Vec<u8>>;
}

/// A rasterizer backed by a closure; see [`from_fn`](fn.from_fn.html).
pub struct FromFn<F> {
    function: F,
}

/// Wraps a closure as a [`Rasterizer`](trait.Rasterizer.html), for plugging
/// in an image pipeline that lives outside this crate.
pub fn from_fn<F>(function: F) -> FromFn<F>
where
    F: FnMut(IconSize) -> io::Result<Vec<u8>>,
{
    FromFn { function }
}

impl<F> Rasterizer for FromFn<F>
where
    F: FnMut(IconSize) -> io::Result<Vec<u8>>,
{
    fn rasterize(&mut self, size: IconSize) -> io::Result<Vec<u8>> {
        (self.function)(size)
    }
}

//===========================================================================//

/// Rasterizes every size in order and packs the results into an ICO file.
///
/// If the rasterizer fails for any size, the whole build fails with that
/// error; sizes are never silently dropped.  Returns an
/// `ErrorKind::InvalidInput` error if `sizes` is empty.
pub fn build_icon<R: Rasterizer + ?Sized>(
    rasterizer: &mut R,
    sizes: &[IconSize],
) -> io::Result<Vec<u8>> {
    if sizes.is_empty() {
        invalid_input!("No icon sizes were requested");
    }
    let mut images = Vec::with_capacity(sizes.len());
    for &size in sizes.iter() {
        let data = rasterizer.rasterize(size)?;
        log::debug!("Rasterized {} icon ({} bytes)", size, data.len());
        images.push(IconImage::new(size, data)?);
    }
    IconDirectory::new(images)?.encode()
}

//===========================================================================//

/// A resampling filter, applied with `image::imageops::resize`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Filter {
    /// Takes the nearest source pixel.  Keeps hard edges, which suits pixel
    /// art.
    Nearest,
    /// Linear interpolation.
    Triangle,
    /// Lanczos with a window of 3.  Sharpest when scaling down.
    #[default]
    Lanczos3,
}

impl Filter {
    /// All filters.
    pub const ALL: &'static [Filter] =
        &[Filter::Nearest, Filter::Triangle, Filter::Lanczos3];

    /// Returns the lowercase name of this filter.
    pub fn name(&self) -> &'static str {
        match *self {
            Filter::Nearest => "nearest",
            Filter::Triangle => "triangle",
            Filter::Lanczos3 => "lanczos3",
        }
    }

    fn filter_type(&self) -> FilterType {
        match *self {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = io::Error;

    fn from_str(name: &str) -> io::Result<Filter> {
        for &filter in Filter::ALL {
            if filter.name().eq_ignore_ascii_case(name) {
                return Ok(filter);
            }
        }
        invalid_input!("Unknown resampling filter: {:?}", name);
    }
}

//===========================================================================//

/// A rasterizer over an in-memory RGBA image.
#[derive(Clone)]
pub struct RgbaRasterizer {
    source: RgbaImage,
    filter: Filter,
}

impl RgbaRasterizer {
    /// Creates a rasterizer from RGBA data in row-major order from top to
    /// bottom.  Returns an error if either dimension is zero or if
    /// `rgba_data` isn't `4 * width * height` bytes long.
    pub fn new(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> io::Result<RgbaRasterizer> {
        if width == 0 || height == 0 {
            invalid_input!("Invalid source size ({}x{})", width, height);
        }
        let expected_data_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_data_len {
            invalid_input!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        match RgbaImage::from_raw(width, height, rgba_data) {
            Some(source) => Ok(RgbaRasterizer::from_image(source)),
            None => invalid_input!("Invalid {}x{} source image", width, height),
        }
    }

    /// Wraps an already-decoded RGBA image.
    pub fn from_image(source: RgbaImage) -> RgbaRasterizer {
        RgbaRasterizer { source, filter: Filter::default() }
    }

    /// Decodes a PNG source image.  The source may be any size, including
    /// larger than 256x256.
    pub fn from_png<R: Read>(reader: R) -> io::Result<RgbaRasterizer> {
        let (width, height, rgba_data) = read_png_rgba(reader)?;
        RgbaRasterizer::new(width, height, rgba_data)
    }

    /// Sets the resampling filter.
    pub fn with_filter(mut self, filter: Filter) -> RgbaRasterizer {
        self.filter = filter;
        self
    }

    /// Returns the resampling filter.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Returns the width of the source image, in pixels.
    pub fn width(&self) -> u32 {
        self.source.width()
    }

    /// Returns the height of the source image, in pixels.
    pub fn height(&self) -> u32 {
        self.source.height()
    }

    /// Resamples the source to exactly `size`, ignoring aspect ratio.
    pub fn resample(&self, size: IconSize) -> RgbaImage {
        if size.width() == self.width() && size.height() == self.height() {
            return self.source.clone();
        }
        imageops::resize(
            &self.source,
            size.width(),
            size.height(),
            self.filter.filter_type(),
        )
    }
}

impl Rasterizer for RgbaRasterizer {
    fn rasterize(&mut self, size: IconSize) -> io::Result<Vec<u8>> {
        let resized = self.resample(size);
        let mut data = Vec::new();
        write_png_rgba(size, resized.as_raw(), &mut data)?;
        Ok(data)
    }
}

//===========================================================================//

/// Caches the output of another rasterizer, so that asking for the same size
/// twice only renders it once.  A cache belongs to a single source image.
pub struct Memoized<R> {
    inner: R,
    cache: HashMap<IconSize, Vec<u8>>,
}

impl<R: Rasterizer> Memoized<R> {
    /// Wraps a rasterizer with an empty cache.
    pub fn new(inner: R) -> Memoized<R> {
        Memoized { inner, cache: HashMap::new() }
    }

    /// Returns the number of cached sizes.
    pub fn num_cached(&self) -> usize {
        self.cache.len()
    }

    /// Drops all cached renderings.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Returns the wrapped rasterizer.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Rasterizer> Rasterizer for Memoized<R> {
    fn rasterize(&mut self, size: IconSize) -> io::Result<Vec<u8>> {
        if let Some(data) = self.cache.get(&size) {
            log::trace!("Using cached {} rendering", size);
            return Ok(data.clone());
        }
        // Errors aren't cached; a later call will try again.
        let data = self.inner.rasterize(size)?;
        self.cache.insert(size, data.clone());
        Ok(data)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{build_icon, from_fn, Filter, Memoized, Rasterizer, RgbaRasterizer};
    use crate::icondir::IconDirectory;
    use crate::payload::read_png_rgba;
    use crate::size::IconSize;
    use std::io::{self, Cursor};

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaRasterizer {
        let rgba = color.repeat((width * height) as usize);
        RgbaRasterizer::new(width, height, rgba).unwrap()
    }

    #[test]
    fn rejects_bad_source() {
        let error = RgbaRasterizer::new(0, 4, Vec::new()).err().unwrap();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        let error = RgbaRasterizer::new(2, 2, vec![0; 15]).err().unwrap();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn nearest_only_uses_source_colors() {
        let rgba = vec![
            10, 10, 10, 255, 200, 200, 200, 255, //
            200, 200, 200, 255, 10, 10, 10, 255,
        ];
        let source = RgbaRasterizer::new(2, 2, rgba)
            .unwrap()
            .with_filter(Filter::Nearest);
        for &side in &[1, 3, 16] {
            let output = source.resample(IconSize::square(side).unwrap());
            assert_eq!((output.width(), output.height()), (side, side));
            assert!(output
                .pixels()
                .all(|pixel| pixel.0[0] == 10 || pixel.0[0] == 200));
        }
    }

    #[test]
    fn triangle_downscale_averages() {
        let rgba = vec![0, 0, 0, 255, 200, 200, 200, 255];
        let source = RgbaRasterizer::new(2, 1, rgba)
            .unwrap()
            .with_filter(Filter::Triangle);
        let output = source.resample(IconSize::new(1, 1).unwrap());
        let value = output.get_pixel(0, 0).0[0];
        assert!((99..=101).contains(&value), "got {}", value);
        assert_eq!(output.get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn default_filter_is_lanczos3() {
        let source = solid(4, 4, [0, 0, 0, 255]);
        assert_eq!(source.filter(), Filter::Lanczos3);
    }

    #[test]
    fn same_size_is_returned_unchanged() {
        let rgba: Vec<u8> = (0..64).collect();
        let source = RgbaRasterizer::new(4, 4, rgba.clone()).unwrap();
        let output = source.resample(IconSize::square(4).unwrap());
        assert_eq!(output.into_raw(), rgba);
    }

    #[test]
    fn solid_color_survives_any_scale() {
        for filter in Filter::ALL.iter().copied() {
            let source = solid(37, 23, [10, 20, 30, 255]).with_filter(filter);
            for &side in &[1, 16, 48, 256] {
                let output = source.resample(IconSize::square(side).unwrap());
                assert_eq!((output.width(), output.height()), (side, side));
                assert!(output.pixels().all(|pixel| pixel.0 == [10, 20, 30, 255]));
            }
        }
    }

    #[test]
    fn rasterize_produces_rgba_png_of_requested_size() {
        let mut source = solid(300, 300, [1, 2, 3, 255]);
        let size = IconSize::new(64, 48).unwrap();
        let data = source.rasterize(size).unwrap();
        let (width, height, rgba) = read_png_rgba(data.as_slice()).unwrap();
        assert_eq!((width, height), (64, 48));
        assert_eq!(&rgba[0..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn filter_names() {
        for &filter in Filter::ALL {
            assert_eq!(filter.name().parse::<Filter>().unwrap(), filter);
        }
        let error = "lanczos".parse::<Filter>().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn memoized_renders_each_size_once() {
        let mut calls = 0;
        {
            let counting = from_fn(|size: IconSize| {
                calls += 1;
                Ok(vec![size.width() as u8])
            });
            let mut memoized = Memoized::new(counting);
            let size = IconSize::square(32).unwrap();
            assert_eq!(memoized.rasterize(size).unwrap(), vec![32]);
            assert_eq!(memoized.rasterize(size).unwrap(), vec![32]);
            assert_eq!(memoized.num_cached(), 1);
            memoized.clear();
            assert_eq!(memoized.num_cached(), 0);
            memoized.rasterize(size).unwrap();
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn build_icon_rejects_empty_size_list() {
        let mut source = solid(16, 16, [0, 0, 0, 255]);
        let error = build_icon(&mut source, &[]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn build_icon_aborts_on_rasterizer_failure() {
        let mut failing = from_fn(|size: IconSize| {
            if size.width() == 48 {
                Err(io::Error::new(io::ErrorKind::Other, "decode failed"))
            } else {
                Ok(vec![0; 8])
            }
        });
        let sizes = [16, 32, 48, 64]
            .iter()
            .map(|&side| IconSize::square(side).unwrap())
            .collect::<Vec<_>>();
        let error = build_icon(&mut failing, &sizes).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn build_icon_packs_sizes_in_order() {
        let mut source = solid(64, 64, [9, 8, 7, 255]);
        let sizes = [
            IconSize::square(32).unwrap(),
            IconSize::square(16).unwrap(),
        ];
        let file = build_icon(&mut source, &sizes).unwrap();
        let icondir = IconDirectory::read(Cursor::new(&file)).unwrap();
        let read_sizes: Vec<IconSize> =
            icondir.images().iter().map(|image| image.size()).collect();
        assert_eq!(read_sizes, sizes.to_vec());
        for image in icondir.images() {
            image.validate().unwrap();
        }
    }
}

//===========================================================================//
