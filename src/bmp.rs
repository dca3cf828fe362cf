use crate::render::RenderedFrame;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

//===========================================================================//

// The signature that all BMP files start with.
const BMP_SIGNATURE: &[u8; 2] = b"BM";

// The size of a BITMAPFILEHEADER struct, in bytes.
pub(crate) const FILE_HEADER_LEN: u32 = 14;

// The size of a BITMAPINFOHEADER struct, in bytes.
pub(crate) const DIB_HEADER_LEN: u32 = 40;

// Frames are always stored as uncompressed BGRA.
const BITS_PER_PIXEL: u16 = 32;
const BI_RGB: u32 = 0;

// 96 DPI, expressed in pixels per meter.
const PIXELS_PER_METER: i32 = 3780;

//===========================================================================//

/// The generic header at the start of a standalone BMP file.  ICO files
/// don't use it; it is stripped before a bitmap is embedded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BitmapFileHeader {
    pub(crate) file_size: u32,
    pub(crate) pixel_data_offset: u32,
}

impl BitmapFileHeader {
    pub(crate) fn read<R: Read>(mut reader: R) -> io::Result<BitmapFileHeader> {
        let mut signature = [0u8; 2];
        reader.read_exact(&mut signature)?;
        if &signature != BMP_SIGNATURE {
            invalid_data!("Invalid BMP signature ({:?})", signature);
        }
        let file_size = reader.read_u32::<LittleEndian>()?;
        let _reserved1 = reader.read_u16::<LittleEndian>()?;
        let _reserved2 = reader.read_u16::<LittleEndian>()?;
        let pixel_data_offset = reader.read_u32::<LittleEndian>()?;
        Ok(BitmapFileHeader { file_size, pixel_data_offset })
    }

    pub(crate) fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(BMP_SIGNATURE)?;
        writer.write_u32::<LittleEndian>(self.file_size)?;
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u32::<LittleEndian>(self.pixel_data_offset)?;
        Ok(())
    }
}

//===========================================================================//

/// A BITMAPINFOHEADER struct.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DibHeader {
    pub(crate) width: i32,
    /// Positive for bottom-up row order.  Inside an ICO file this counts the
    /// rows of both the color plane and the AND mask.
    pub(crate) height: i32,
    pub(crate) planes: u16,
    pub(crate) bits_per_pixel: u16,
    pub(crate) compression: u32,
    pub(crate) image_size: u32,
    pub(crate) horz_ppm: i32,
    pub(crate) vert_ppm: i32,
    pub(crate) colors_used: u32,
    pub(crate) colors_important: u32,
}

impl DibHeader {
    /// Returns the header of a bottom-up 32-bpp bitmap of the given size.
    pub(crate) fn for_bgra(width: u32, height: u32) -> DibHeader {
        DibHeader {
            width: width as i32,
            height: height as i32,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: BI_RGB,
            image_size: 4 * width * height,
            horz_ppm: PIXELS_PER_METER,
            vert_ppm: PIXELS_PER_METER,
            colors_used: 0,
            colors_important: 0,
        }
    }

    pub(crate) fn read<R: Read>(mut reader: R) -> io::Result<DibHeader> {
        let header_size = reader.read_u32::<LittleEndian>()?;
        if header_size != DIB_HEADER_LEN {
            invalid_data!(
                "Invalid BMP header size (was {}, must be {})",
                header_size,
                DIB_HEADER_LEN
            );
        }
        Ok(DibHeader {
            width: reader.read_i32::<LittleEndian>()?,
            height: reader.read_i32::<LittleEndian>()?,
            planes: reader.read_u16::<LittleEndian>()?,
            bits_per_pixel: reader.read_u16::<LittleEndian>()?,
            compression: reader.read_u32::<LittleEndian>()?,
            image_size: reader.read_u32::<LittleEndian>()?,
            horz_ppm: reader.read_i32::<LittleEndian>()?,
            vert_ppm: reader.read_i32::<LittleEndian>()?,
            colors_used: reader.read_u32::<LittleEndian>()?,
            colors_important: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub(crate) fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(DIB_HEADER_LEN)?;
        writer.write_i32::<LittleEndian>(self.width)?;
        writer.write_i32::<LittleEndian>(self.height)?;
        writer.write_u16::<LittleEndian>(self.planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.compression)?;
        writer.write_u32::<LittleEndian>(self.image_size)?;
        writer.write_i32::<LittleEndian>(self.horz_ppm)?;
        writer.write_i32::<LittleEndian>(self.vert_ppm)?;
        writer.write_u32::<LittleEndian>(self.colors_used)?;
        writer.write_u32::<LittleEndian>(self.colors_important)?;
        Ok(())
    }

    /// Returns a copy of this header whose height also covers an AND mask
    /// of the same size as the color plane, as ICO files require.
    pub(crate) fn with_mask_plane(&self) -> io::Result<DibHeader> {
        let height = match self.height.checked_mul(2) {
            Some(height) => height,
            None => invalid_input!(
                "BMP height is too large to double ({})",
                self.height
            ),
        };
        Ok(DibHeader { height, ..*self })
    }
}

//===========================================================================//

/// Encodes a frame as a complete standalone BMP file: file header, DIB
/// header, then 32-bpp BGRA rows starting from the *bottom* row.
pub(crate) fn encode_bmp(frame: &RenderedFrame) -> io::Result<Vec<u8>> {
    let width = frame.width();
    let height = frame.height();
    let rgba = frame.rgba_data();
    let dib_header = DibHeader::for_bgra(width, height);
    let pixel_data_offset = FILE_HEADER_LEN + DIB_HEADER_LEN;
    let file_size = pixel_data_offset + dib_header.image_size;
    let mut data = Vec::<u8>::with_capacity(file_size as usize);
    BitmapFileHeader { file_size, pixel_data_offset }.write(&mut data)?;
    dib_header.write(&mut data)?;
    debug_assert_eq!(data.len(), pixel_data_offset as usize);
    // Each 32-bpp row is already a multiple of four bytes, so no padding.
    let row_len = 4 * width as usize;
    for row in rgba.chunks_exact(row_len).rev() {
        for pixel in row.chunks_exact(4) {
            data.write_u8(pixel[2])?;
            data.write_u8(pixel[1])?;
            data.write_u8(pixel[0])?;
            data.write_u8(pixel[3])?;
        }
    }
    debug_assert_eq!(data.len(), file_size as usize);
    Ok(data)
}

/// Removes the file header from a standalone BMP file, leaving the DIB
/// header and pixel data.
pub(crate) fn strip_file_header(mut data: Vec<u8>) -> io::Result<Vec<u8>> {
    let file_header = BitmapFileHeader::read(data.as_slice())?;
    if file_header.file_size as usize != data.len() {
        invalid_data!(
            "BMP file size mismatch (header says {}, but data has {})",
            file_header.file_size,
            data.len()
        );
    }
    if file_header.pixel_data_offset != FILE_HEADER_LEN + DIB_HEADER_LEN {
        invalid_data!(
            "Unexpected BMP pixel data offset ({})",
            file_header.pixel_data_offset
        );
    }
    data.drain(..FILE_HEADER_LEN as usize);
    Ok(data)
}

/// Rewrites the DIB header at the start of `dib` so that its height also
/// counts the AND mask rows.
pub(crate) fn add_mask_plane(dib: &mut [u8]) -> io::Result<()> {
    let header = DibHeader::read(&*dib)?.with_mask_plane()?;
    header.write(&mut dib[..DIB_HEADER_LEN as usize])
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{
        add_mask_plane, encode_bmp, strip_file_header, BitmapFileHeader,
        DibHeader, DIB_HEADER_LEN, FILE_HEADER_LEN,
    };
    use crate::config::FrameSpec;
    use crate::render::RenderedFrame;

    fn two_by_two() -> RenderedFrame {
        // Top row: red, green.  Bottom row: blue, half-transparent white.
        let rgba: &[u8] = b"\xff\x00\x00\xff\x00\xff\x00\xff\
                            \x00\x00\xff\xff\xff\xff\xff\x7f";
        RenderedFrame::from_rgba_data(FrameSpec::square(2), rgba.to_vec())
    }

    #[test]
    fn dib_header_round_trip() {
        let header = DibHeader::for_bgra(48, 32);
        let mut data = Vec::new();
        header.write(&mut data).unwrap();
        assert_eq!(data.len(), DIB_HEADER_LEN as usize);
        assert_eq!(DibHeader::read(data.as_slice()).unwrap(), header);
    }

    #[test]
    fn mask_plane_doubles_height_only() {
        let header = DibHeader::for_bgra(48, 32);
        let doubled = header.with_mask_plane().unwrap();
        assert_eq!(doubled.height, 64);
        assert_eq!(doubled.width, 48);
        assert_eq!(doubled.image_size, header.image_size);
    }

    #[test]
    fn mask_plane_height_overflow() {
        let header = DibHeader { height: i32::MAX, ..DibHeader::for_bgra(1, 1) };
        assert!(header.with_mask_plane().is_err());
    }

    #[test]
    fn encode_bmp_file() {
        let data = encode_bmp(&two_by_two()).unwrap();
        let expected: &[u8] = b"\
            BM\x46\x00\x00\x00\x00\x00\x00\x00\x36\x00\x00\x00\
            \
            \x28\x00\x00\x00\x02\x00\x00\x00\x02\x00\x00\x00\
            \x01\x00\x20\x00\x00\x00\x00\x00\x10\x00\x00\x00\
            \xc4\x0e\x00\x00\xc4\x0e\x00\x00\x00\x00\x00\x00\
            \x00\x00\x00\x00\
            \
            \xff\x00\x00\xff\xff\xff\xff\x7f\
            \x00\x00\xff\xff\x00\xff\x00\xff";
        assert_eq!(data.as_slice(), expected);
    }

    #[test]
    fn strip_and_patch_bmp() {
        let file = encode_bmp(&two_by_two()).unwrap();
        let file_len = file.len();
        let mut dib = strip_file_header(file).unwrap();
        assert_eq!(dib.len(), file_len - FILE_HEADER_LEN as usize);
        add_mask_plane(&mut dib).unwrap();
        let header = DibHeader::read(dib.as_slice()).unwrap();
        assert_eq!(header.width, 2);
        assert_eq!(header.height, 4);
        // The height field sits 8 bytes into the DIB header.
        assert_eq!(&dib[8..12], b"\x04\x00\x00\x00");
    }

    #[test]
    fn strip_rejects_non_bmp() {
        let mut data = encode_bmp(&two_by_two()).unwrap();
        data[0] = b'X';
        assert!(strip_file_header(data).is_err());
    }

    #[test]
    fn strip_rejects_truncated_bmp() {
        let mut data = encode_bmp(&two_by_two()).unwrap();
        data.pop();
        assert!(strip_file_header(data).is_err());
    }

    #[test]
    fn file_header_round_trip() {
        let header = BitmapFileHeader { file_size: 1234, pixel_data_offset: 54 };
        let mut data = Vec::new();
        header.write(&mut data).unwrap();
        assert_eq!(data.len(), FILE_HEADER_LEN as usize);
        assert_eq!(BitmapFileHeader::read(data.as_slice()).unwrap(), header);
    }
}

//===========================================================================//
