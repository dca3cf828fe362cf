use crate::config::FrameSpec;
use crate::error::Result;
use crate::package::{EncodedPayload, PNG_SIGNATURE};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};
use std::io::{self, Read, Seek, SeekFrom, Write};

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const HEADER_LEN: u32 = 6;

/// The size of one ICONDIRENTRY record, in bytes.
pub const ENTRY_LEN: u32 = 16;

// The resource type number for icons (cursors use 2).
const ICON_TYPE: u16 = 1;

//===========================================================================//

/// One ICONDIRENTRY record, describing where a frame's data lives.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DirectoryEntry {
    width: u32,
    height: u32,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_size: u32,
    data_offset: u32,
}

impl DirectoryEntry {
    fn for_payload(
        spec: FrameSpec,
        payload: &EncodedPayload,
        data_size: u32,
        data_offset: u32,
    ) -> DirectoryEntry {
        DirectoryEntry {
            width: spec.width(),
            height: spec.height(),
            num_colors: 0,
            color_planes: 1,
            bits_per_pixel: payload.bits_per_pixel(),
            data_size,
            data_offset,
        }
    }

    fn read<R: Read>(reader: &mut R) -> io::Result<DirectoryEntry> {
        let width_byte = reader.read_u8()?;
        let height_byte = reader.read_u8()?;
        let num_colors = reader.read_u8()?;
        let reserved = reader.read_u8()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIRENTRY \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let color_planes = reader.read_u16::<LittleEndian>()?;
        let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
        let data_size = reader.read_u32::<LittleEndian>()?;
        let data_offset = reader.read_u32::<LittleEndian>()?;
        // A width/height byte of zero stands for 256.
        let width = if width_byte == 0 { 256 } else { width_byte as u32 };
        let height = if height_byte == 0 { 256 } else { height_byte as u32 };
        Ok(DirectoryEntry {
            width,
            height,
            num_colors,
            color_planes,
            bits_per_pixel,
            data_size,
            data_offset,
        })
    }

    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let spec = FrameSpec::new(self.width, self.height);
        writer.write_u8(spec.width_byte())?;
        writer.write_u8(spec.height_byte())?;
        writer.write_u8(self.num_colors)?;
        writer.write_u8(0)?; // reserved
        writer.write_u16::<LittleEndian>(self.color_planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.data_size)?;
        writer.write_u32::<LittleEndian>(self.data_offset)?;
        Ok(())
    }

    /// Returns the width of the frame, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the frame, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of palette colors (always zero for frames written
    /// by this crate).
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the number of color planes.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel (color depth) of the frame.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the length of the frame's data, in bytes.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Returns the position of the frame's data from the start of the file.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }
}

//===========================================================================//

/// Builds a complete ICO file from frame sizes and their encoded payloads.
///
/// `specs` and `payloads` must line up one-to-one; their order becomes the
/// order of both the directory and the image data.  Nothing is returned
/// unless the whole file could be laid out.
pub fn assemble(
    specs: &[FrameSpec],
    payloads: &[EncodedPayload],
) -> Result<Vec<u8>> {
    if specs.len() != payloads.len() {
        invariant_violation!(
            "Got {} frame sizes but {} payloads",
            specs.len(),
            payloads.len()
        );
    }
    if specs.len() > (u16::MAX as usize) {
        invariant_violation!(
            "Too many frames (was {}, but max is {})",
            specs.len(),
            u16::MAX
        );
    }
    let num_entries = specs.len() as u16;
    let mut data_offset = HEADER_LEN + ENTRY_LEN * (num_entries as u32);
    let mut entries = Vec::<DirectoryEntry>::with_capacity(specs.len());
    for (index, (&spec, payload)) in specs.iter().zip(payloads).enumerate() {
        if !spec.is_valid() {
            invariant_violation!(
                "Frame {} has a size ({}) that ICONDIRENTRY can't store",
                index,
                spec
            );
        }
        if payload.spec() != spec {
            invariant_violation!(
                "Frame {} is {}, but its payload was encoded at {}",
                index,
                spec,
                payload.spec()
            );
        }
        let data_size = match u32::try_from(payload.len()) {
            Ok(size) => size,
            Err(_) => invariant_violation!(
                "Frame {} payload is too large ({} bytes)",
                index,
                payload.len()
            ),
        };
        let entry =
            DirectoryEntry::for_payload(spec, payload, data_size, data_offset);
        trace!("ICONDIRENTRY {}: {:?}", index, entry);
        entries.push(entry);
        data_offset = match data_offset.checked_add(data_size) {
            Some(offset) => offset,
            None => invariant_violation!("ICO file exceeds 4 GiB"),
        };
    }
    let mut output = Vec::<u8>::with_capacity(data_offset as usize);
    output.write_u16::<LittleEndian>(0)?; // reserved
    output.write_u16::<LittleEndian>(ICON_TYPE)?;
    output.write_u16::<LittleEndian>(num_entries)?;
    for entry in entries.iter() {
        entry.write(&mut output)?;
    }
    for payload in payloads.iter() {
        output.write_all(payload.data())?;
    }
    if output.len() != data_offset as usize {
        invariant_violation!(
            "ICO file is {} bytes, but its directory accounts for {}",
            output.len(),
            data_offset
        );
    }
    debug!("Assembled ICO with {} frames ({} bytes)", num_entries, output.len());
    Ok(output)
}

//===========================================================================//

/// The contents of an ICO file, as read back from disk or memory.
#[derive(Clone, Debug)]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Returns the entries in directory order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Reads an ICO file into memory.
    pub fn read<R: Read + Seek>(mut reader: R) -> io::Result<IconDir> {
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
        let mut records = Vec::<DirectoryEntry>::with_capacity(num_entries);
        for _ in 0..num_entries {
            records.push(DirectoryEntry::read(&mut reader)?);
        }
        let stream_len = reader.seek(SeekFrom::End(0))?;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        for record in records {
            let data_end =
                record.data_offset as u64 + record.data_size as u64;
            if data_end > stream_len {
                invalid_data!(
                    "Image data extends past end of file \
                     (ends at {}, but file is {} bytes)",
                    data_end,
                    stream_len
                );
            }
            reader.seek(SeekFrom::Start(record.data_offset as u64))?;
            let mut data = vec![0u8; record.data_size as usize];
            reader.read_exact(&mut data)?;
            entries.push(IconDirEntry { record, data });
        }
        Ok(IconDir { entries })
    }
}

//===========================================================================//

/// One frame of an ICO file: its directory record and its raw image data.
#[derive(Clone, Debug)]
pub struct IconDirEntry {
    record: DirectoryEntry,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Returns the directory record for this frame.
    pub fn record(&self) -> &DirectoryEntry {
        &self.record
    }

    /// Returns the width of the frame, in pixels.
    pub fn width(&self) -> u32 {
        self.record.width
    }

    /// Returns the height of the frame, in pixels.
    pub fn height(&self) -> u32 {
        self.record.height
    }

    /// Returns true if the frame is stored as a PNG, or false if it is
    /// stored as a BMP.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{assemble, IconDir};
    use crate::config::{EncodeOptions, FrameSpec};
    use crate::error::Error;
    use crate::package::{package, EncodedPayload};
    use crate::render::RenderedFrame;
    use std::io::Cursor;

    fn payload(width: u32, height: u32) -> EncodedPayload {
        let spec = FrameSpec::new(width, height);
        let rgba = vec![0x80; (4 * width * height) as usize];
        let frame = RenderedFrame::from_rgba_data(spec, rgba);
        package(&frame, &EncodeOptions::default()).unwrap()
    }

    #[test]
    fn read_empty_icon_set() {
        let input = b"\x00\x00\x01\x00\x00\x00";
        let icondir = IconDir::read(Cursor::new(input)).unwrap();
        assert_eq!(icondir.entries().len(), 0);
    }

    #[test]
    fn read_rejects_cursor_set() {
        let input = b"\x00\x00\x02\x00\x00\x00";
        assert!(IconDir::read(Cursor::new(input)).is_err());
    }

    #[test]
    fn read_rejects_data_past_end_of_file() {
        // One entry claiming 4 GiB of data at offset 22, in a 26-byte file.
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x10\x10\x00\x00\x01\x00\x20\x00\
            \xff\xff\xff\xff\x16\x00\x00\x00\
            \
            \x28\x00\x00\x00";
        let error = IconDir::read(Cursor::new(input)).unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn assemble_empty_icon_set() {
        let output = assemble(&[], &[]).unwrap();
        let expected: &[u8] = b"\x00\x00\x01\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn assemble_one_bmp_frame() {
        let payloads = vec![payload(2, 2)];
        let output = assemble(&[FrameSpec::square(2)], &payloads).unwrap();
        let expected_header: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x02\x02\x00\x00\x01\x00\x20\x00\
            \x38\x00\x00\x00\x16\x00\x00\x00";
        assert_eq!(&output[..22], expected_header);
        assert_eq!(&output[22..], payloads[0].data());
    }

    #[test]
    fn assemble_offsets_accumulate() {
        let specs = [
            FrameSpec::square(16),
            FrameSpec::new(32, 24),
            FrameSpec::square(256),
        ];
        let payloads: Vec<EncodedPayload> = specs
            .iter()
            .map(|spec| payload(spec.width(), spec.height()))
            .collect();
        let output = assemble(&specs, &payloads).unwrap();
        let icondir = IconDir::read(Cursor::new(&output)).unwrap();
        assert_eq!(icondir.entries().len(), 3);
        let mut expected_offset = 6 + 16 * 3;
        for (index, entry) in icondir.entries().iter().enumerate() {
            let record = entry.record();
            assert_eq!(record.width(), specs[index].width());
            assert_eq!(record.height(), specs[index].height());
            assert_eq!(record.data_offset(), expected_offset);
            assert_eq!(record.data_size() as usize, payloads[index].len());
            assert_eq!(entry.data(), payloads[index].data());
            expected_offset += record.data_size();
        }
        assert_eq!(output.len(), expected_offset as usize);
    }

    #[test]
    fn assemble_mismatched_lengths() {
        let payloads = vec![payload(16, 16)];
        let specs = [FrameSpec::square(16), FrameSpec::square(32)];
        let result = assemble(&specs, &payloads);
        assert!(matches!(result, Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn assemble_misaligned_payload() {
        let payloads = vec![payload(16, 16)];
        let result = assemble(&[FrameSpec::square(32)], &payloads);
        assert!(matches!(result, Err(Error::InvariantViolation(_))));
    }
}

//===========================================================================//
