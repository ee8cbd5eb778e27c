use crate::payload::IconImage;
use crate::size::IconSize;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Seek, SeekFrom, Write};

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const HEADER_LEN: u32 = 6;

/// The size of one ICONDIRENTRY, in bytes.
pub const ENTRY_LEN: u32 = 16;

// ICONDIR resource type for icons (cursors are 2).
const ICON_TYPE: u16 = 1;

// Every payload is a 32-bit RGBA PNG, with no palette.
const NUM_COLORS: u8 = 0;
const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// The images of a single ICO file, in the order they will be written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconDirectory {
    images: Vec<IconImage>,
}

impl IconDirectory {
    /// Creates a directory from a non-empty list of images.  Returns an
    /// `ErrorKind::InvalidInput` error if `images` is empty or has more
    /// entries than the format can count.
    pub fn new(images: Vec<IconImage>) -> io::Result<IconDirectory> {
        if images.is_empty() {
            invalid_input!("An ICO file must contain at least one image");
        }
        if images.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many images for one ICO file (was {}, but max is {})",
                images.len(),
                u16::MAX
            );
        }
        Ok(IconDirectory { images })
    }

    /// Returns the images in this directory, in file order.
    pub fn images(&self) -> &[IconImage] {
        &self.images
    }

    /// Consumes the directory, returning its images.
    pub fn into_images(self) -> Vec<IconImage> {
        self.images
    }

    /// Computes the absolute byte offset of each image's payload.  Returns an
    /// error if any payload's declared length is wrong, or if the file would
    /// be too large for 32-bit offsets.
    pub fn payload_offsets(&self) -> io::Result<Vec<u32>> {
        let mut offsets = Vec::with_capacity(self.images.len());
        let mut data_offset =
            HEADER_LEN as u64 + ENTRY_LEN as u64 * self.images.len() as u64;
        for image in self.images.iter() {
            image.check_byte_length()?;
            offsets.push(data_offset as u32);
            data_offset += image.byte_length() as u64;
            if data_offset > u32::MAX as u64 {
                invalid_input!(
                    "ICO file would be too large ({} bytes or more)",
                    data_offset
                );
            }
        }
        Ok(offsets)
    }

    /// Returns the total length of the encoded file, in bytes.
    pub fn encoded_len(&self) -> io::Result<usize> {
        let offsets = self.payload_offsets()?;
        let last = self.images.len() - 1;
        Ok(offsets[last] as usize + self.images[last].byte_length() as usize)
    }

    /// Writes the ICO file.  Every payload length is checked before anything
    /// is written, so a bad image never leaves a half-written file behind.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let offsets = self.payload_offsets()?;
        log::debug!(
            "Writing ICO file with {} image(s), {} bytes of payload",
            self.images.len(),
            self.images.iter().map(|image| image.byte_length() as u64).sum::<u64>()
        );
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_TYPE)?;
        writer.write_u16::<LittleEndian>(self.images.len() as u16)?;
        for (image, &data_offset) in self.images.iter().zip(offsets.iter()) {
            let size = image.size();
            log::trace!(
                "ICONDIRENTRY {}: {} bytes at offset {}",
                size,
                image.byte_length(),
                data_offset
            );
            writer.write_u8(size.width_byte())?;
            writer.write_u8(size.height_byte())?;
            writer.write_u8(NUM_COLORS)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(COLOR_PLANES)?;
            writer.write_u16::<LittleEndian>(BITS_PER_PIXEL)?;
            writer.write_u32::<LittleEndian>(image.byte_length())?;
            writer.write_u32::<LittleEndian>(data_offset)?;
        }
        for image in self.images.iter() {
            writer.write_all(image.data())?;
        }
        Ok(())
    }

    /// Encodes the ICO file into a new buffer.
    pub fn encode(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.encoded_len()?);
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads an ICO file into memory.  Payloads are kept as raw bytes and not
    /// decoded.  Cursor files and files with no images are rejected.
    pub fn read<R: Read + Seek>(reader: R) -> io::Result<IconDirectory> {
        let (icondir, _offsets) = IconDirectory::read_with_offsets(reader)?;
        Ok(icondir)
    }

    /// Like [`read`](#method.read), but also returns the payload offset
    /// declared by each ICONDIRENTRY.  Other writers don't always pack
    /// payloads the way [`payload_offsets`](#method.payload_offsets) does.
    pub fn read_with_offsets<R: Read + Seek>(
        mut reader: R,
    ) -> io::Result<(IconDirectory, Vec<u32>)> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICON_TYPE {
            invalid_data!(
                "Invalid resource type (was {}, but must be {})",
                restype,
                ICON_TYPE
            );
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        if num_entries == 0 {
            invalid_data!("ICO file contains no images");
        }
        let mut entries = Vec::<(IconSize, u32, u32)>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width_byte = reader.read_u8()?;
            let height_byte = reader.read_u8()?;
            let _num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                invalid_data!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let _color_planes = reader.read_u16::<LittleEndian>()?;
            let _bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            let size = IconSize::from_bytes(width_byte, height_byte);
            entries.push((size, data_offset, data_size));
        }
        let mut images = Vec::with_capacity(num_entries);
        let mut offsets = Vec::with_capacity(num_entries);
        for (size, data_offset, data_size) in entries.into_iter() {
            reader.seek(SeekFrom::Start(data_offset as u64))?;
            // The declared size is untrusted, so let the buffer grow only as
            // far as the stream actually goes.
            let mut data = Vec::new();
            (&mut reader).take(data_size as u64).read_to_end(&mut data)?;
            if data.len() != data_size as usize {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "Payload for {} image is truncated \
                         (declared {} bytes, but only {} remain)",
                        size,
                        data_size,
                        data.len()
                    ),
                ));
            }
            images.push(IconImage::with_byte_length(size, data, data_size));
            offsets.push(data_offset);
        }
        Ok((IconDirectory { images }, offsets))
    }
}

//===========================================================================//


//===========================================================================//
