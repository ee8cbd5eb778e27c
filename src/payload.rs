use crate::size::{IconSize, MAX_DIMENSION, MIN_DIMENSION};
use std::io::{self, Read, Write};

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

//===========================================================================//

/// One image to be embedded in an ICO file: a standalone PNG payload plus
/// the size it is declared to have.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconImage {
    size: IconSize,
    byte_length: u32,
    data: Vec<u8>,
}

impl IconImage {
    /// Creates an image from already-encoded PNG data, declaring it to be of
    /// the given size.  The PNG data itself is not inspected (see
    /// [`validate`](#method.validate)).  Returns an error if the payload is
    /// too large to be addressed by an ICO file.
    pub fn new(size: IconSize, data: Vec<u8>) -> io::Result<IconImage> {
        if data.len() > (u32::MAX as usize) {
            invalid_input!(
                "PNG payload for {} image is too large ({} bytes)",
                size,
                data.len()
            );
        }
        let byte_length = data.len() as u32;
        Ok(IconImage { size, byte_length, data })
    }

    /// Creates an image whose byte length is declared separately from its
    /// data, as when the length comes from another source (for example, a
    /// blob size reported alongside the bytes).  A mismatch is not detected
    /// here; encoding will fail with `ErrorKind::InvalidData` instead of
    /// writing a corrupt file.
    pub fn with_byte_length(
        size: IconSize,
        data: Vec<u8>,
        byte_length: u32,
    ) -> IconImage {
        IconImage { size, byte_length, data }
    }

    /// Creates an image from PNG data, reading its size from the PNG header.
    /// Returns an error if the data isn't PNG or if the image is larger than
    /// 256 pixels in either dimension.
    pub fn from_png(data: Vec<u8>) -> io::Result<IconImage> {
        let (width, height) = read_png_size(data.as_slice())?;
        let size = match IconSize::new(width, height) {
            Ok(size) => size,
            Err(_) => invalid_data!(
                "PNG image is {}x{}, but ICO images must be between {} and {} \
                 pixels on each side",
                width,
                height,
                MIN_DIMENSION,
                MAX_DIMENSION
            ),
        };
        IconImage::new(size, data)
    }

    /// Returns the declared size of the image.
    pub fn size(&self) -> IconSize {
        self.size
    }

    /// Returns the declared length of the payload, in bytes.
    pub fn byte_length(&self) -> u32 {
        self.byte_length
    }

    /// Returns the raw PNG payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image, returning the raw PNG payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns true if the payload starts with the PNG signature.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Checks that the declared byte length matches the payload.
    pub(crate) fn check_byte_length(&self) -> io::Result<()> {
        if (self.byte_length as usize) != self.data.len() {
            invalid_data!(
                "Declared payload length for {} image was {}, but the \
                 payload has {} bytes",
                self.size,
                self.byte_length,
                self.data.len()
            );
        }
        Ok(())
    }

    /// Checks that the payload is a PNG whose header dimensions match the
    /// declared size and whose declared length is right.  Encoding never does
    /// this on its own; call it when the payload comes from an untrusted
    /// source.
    pub fn validate(&self) -> io::Result<()> {
        self.check_byte_length()?;
        if !self.is_png() {
            invalid_data!("Payload for {} image is not PNG data", self.size);
        }
        let (width, height) = read_png_size(self.data.as_slice())?;
        if width != self.size.width() || height != self.size.height() {
            invalid_data!(
                "Encoded image has wrong dimensions \
                 (was {}x{}, but should be {})",
                width,
                height,
                self.size
            );
        }
        Ok(())
    }
}

//===========================================================================//

fn read_png_info<R: Read>(reader: R) -> io::Result<png::Reader<R>> {
    let mut decoder = png::Decoder::new(reader);
    // Normalize palettes, low bit depths and 16-bit channels to 8 bits.
    decoder.set_transformations(
        png::Transformations::EXPAND | png::Transformations::STRIP_16,
    );
    match decoder.read_info() {
        Ok(png_reader) => Ok(png_reader),
        Err(error) => invalid_data!("Malformed PNG data: {}", error),
    }
}

/// Decodes just enough of a PNG to determine its size.
pub(crate) fn read_png_size<R: Read>(reader: R) -> io::Result<(u32, u32)> {
    let png_reader = read_png_info(reader)?;
    let info = png_reader.info();
    if info.width < MIN_DIMENSION || info.height < MIN_DIMENSION {
        invalid_data!("Invalid PNG size ({}x{})", info.width, info.height);
    }
    Ok((info.width, info.height))
}

/// Decodes a PNG into 8-bit RGBA data, returning the width, height and
/// pixels in row-major order from top to bottom.
pub(crate) fn read_png_rgba<R: Read>(
    reader: R,
) -> io::Result<(u32, u32, Vec<u8>)> {
    let mut png_reader = read_png_info(reader)?;
    let mut buffer = vec![0u8; png_reader.output_buffer_size()];
    let frame = match png_reader.next_frame(&mut buffer) {
        Ok(frame) => frame,
        Err(error) => invalid_data!("Malformed PNG data: {}", error),
    };
    buffer.truncate(frame.buffer_size());
    let rgba_data = match frame.color_type {
        png::ColorType::Rgba => buffer,
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity((buffer.len() / 3) * 4);
            for pixel in buffer.chunks_exact(3) {
                rgba.extend_from_slice(pixel);
                rgba.push(u8::MAX);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity(buffer.len() * 2);
            for pixel in buffer.chunks_exact(2) {
                rgba.extend_from_slice(&[pixel[0], pixel[0], pixel[0], pixel[1]]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity(buffer.len() * 4);
            for &gray in buffer.iter() {
                rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
            }
            rgba
        }
        png::ColorType::Indexed => {
            // EXPAND should have turned this into RGB(A).
            invalid_data!("Unsupported PNG color type: {:?}", frame.color_type);
        }
    };
    Ok((frame.width, frame.height, rgba_data))
}

/// Encodes 8-bit RGBA data as a 32 bpp PNG.
pub(crate) fn write_png_rgba<W: Write>(
    size: IconSize,
    rgba_data: &[u8],
    writer: W,
) -> io::Result<()> {
    debug_assert_eq!(rgba_data.len(), size.num_pixels() * 4);
    match write_png_rgba_enc(size, rgba_data, writer) {
        Ok(()) => Ok(()),
        Err(png::EncodingError::IoError(error)) => Err(error),
        Err(png::EncodingError::Format(error)) => {
            invalid_input!("PNG format error: {}", error);
        }
        Err(png::EncodingError::LimitsExceeded) => {
            invalid_input!("PNG limits exceeded");
        }
        Err(png::EncodingError::Parameter(error)) => {
            invalid_input!("PNG parameter error: {}", error);
        }
    }
}

fn write_png_rgba_enc<W: Write>(
    size: IconSize,
    rgba_data: &[u8],
    writer: W,
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(writer, size.width(), size.height());
    // Always RGBA, even for opaque images, so every entry is 32 bpp.
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba_data)?;
    Ok(())
}

//===========================================================================//


//===========================================================================//
