use crate::bmp;
use crate::config::{EncodeOptions, FrameSpec};
use crate::error::Result;
use crate::render::RenderedFrame;
use log::debug;
use std::io::{self, Write};

//===========================================================================//

// The signature that all PNG files start with.
pub(crate) const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

//===========================================================================//

/// How a frame's image data is stored inside the icon.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SubFormat {
    /// A complete PNG file.
    Png,
    /// A BMP without its file header, with the height doubled to cover the
    /// AND mask.
    Bmp,
}

/// The encoded image data for one frame, ready to embed in an icon.
#[derive(Clone, Debug)]
pub struct EncodedPayload {
    spec: FrameSpec,
    format: SubFormat,
    data: Vec<u8>,
}

impl EncodedPayload {
    /// Returns the size of the frame this payload encodes.
    pub fn spec(&self) -> FrameSpec {
        self.spec
    }

    /// Returns how the image data is stored.
    pub fn format(&self) -> SubFormat {
        self.format
    }

    /// Returns the encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of encoded bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no encoded bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the bits-per-pixel recorded in the icon directory.
    pub fn bits_per_pixel(&self) -> u16 {
        32
    }
}

//===========================================================================//

/// Encodes a rendered frame, choosing PNG or BMP storage based on its size.
pub fn package(
    frame: &RenderedFrame,
    options: &EncodeOptions,
) -> Result<EncodedPayload> {
    let spec = frame.spec();
    let result = if options.use_compressed(spec) {
        package_png(frame)
    } else {
        package_bmp(frame)
    };
    let payload = match result {
        Ok(payload) => payload,
        Err(source) => encode_error!(spec, source),
    };
    debug!(
        "Packaged {} frame as {:?} ({} bytes)",
        spec,
        payload.format,
        payload.len()
    );
    Ok(payload)
}

fn package_bmp(frame: &RenderedFrame) -> io::Result<EncodedPayload> {
    let file = bmp::encode_bmp(frame)?;
    let mut data = bmp::strip_file_header(file)?;
    bmp::add_mask_plane(&mut data)?;
    Ok(EncodedPayload { spec: frame.spec(), format: SubFormat::Bmp, data })
}

fn package_png(frame: &RenderedFrame) -> io::Result<EncodedPayload> {
    let mut data = Vec::new();
    match write_png(frame, &mut data) {
        Ok(()) => {}
        Err(png::EncodingError::IoError(error)) => return Err(error),
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
    Ok(EncodedPayload { spec: frame.spec(), format: SubFormat::Png, data })
}

fn write_png<W: Write>(
    frame: &RenderedFrame,
    writer: W,
) -> std::result::Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(writer, frame.width(), frame.height());
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_color(png::ColorType::Rgba);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(frame.rgba_data())?;
    writer.finish()
}

//===========================================================================//


//===========================================================================//
