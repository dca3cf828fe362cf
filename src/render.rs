use crate::config::{AlphaMode, EncodeOptions, FrameSpec};
use crate::config::{MAX_DIMENSION, MIN_DIMENSION};
use crate::error::Result;
use image::DynamicImage;
use log::debug;
use std::path::Path;

//===========================================================================//

/// A source image resized to the dimensions of one frame, as 8-bit RGBA.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    spec: FrameSpec,
    rgba_data: Vec<u8>,
}

impl RenderedFrame {
    /// Creates a frame from RGBA data.  The `rgba_data` must have four bytes
    /// per pixel and be in row-major order from top to bottom.  Panics if
    /// `spec` is out of range or if `rgba_data` is the wrong length.
    pub fn from_rgba_data(spec: FrameSpec, rgba_data: Vec<u8>) -> RenderedFrame {
        if !spec.is_valid() {
            panic!(
                "Invalid frame size (was {}, but each dimension must be \
                 between {} and {})",
                spec, MIN_DIMENSION, MAX_DIMENSION
            );
        }
        let expected_data_len =
            (spec.width() as usize) * (spec.height() as usize) * 4;
        if rgba_data.len() != expected_data_len {
            panic!(
                "Invalid data length (was {}, but must be {} for {} frame)",
                rgba_data.len(),
                expected_data_len,
                spec
            );
        }
        RenderedFrame { spec, rgba_data }
    }

    /// Returns the size this frame was rendered at.
    pub fn spec(&self) -> FrameSpec {
        self.spec
    }

    /// Returns the width of the frame, in pixels.
    pub fn width(&self) -> u32 {
        self.spec.width()
    }

    /// Returns the height of the frame, in pixels.
    pub fn height(&self) -> u32 {
        self.spec.height()
    }

    /// Returns the RGBA data for this frame, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }
}

//===========================================================================//

/// Resizes `source` to exactly the dimensions of `spec`.
///
/// The source is expanded to RGBA before resampling, so palette-indexed,
/// grayscale and RGB sources all produce four-channel frames.  Fails if the
/// frame size can't be stored in an icon or if the source is empty.
pub fn render(
    source: &DynamicImage,
    spec: FrameSpec,
    options: &EncodeOptions,
) -> Result<RenderedFrame> {
    if !spec.is_valid() {
        render_error!(
            "Invalid frame size (was {}, but each dimension must be \
             between {} and {})",
            spec,
            MIN_DIMENSION,
            MAX_DIMENSION
        );
    }
    if source.width() == 0 || source.height() == 0 {
        render_error!(
            "Source image is empty ({}x{})",
            source.width(),
            source.height()
        );
    }
    let rgba = source.to_rgba8();
    let resized = image::imageops::resize(
        &rgba,
        spec.width(),
        spec.height(),
        options.filter.filter_type(),
    );
    let mut rgba_data = resized.into_raw();
    if options.alpha == AlphaMode::Remove {
        for pixel in rgba_data.chunks_exact_mut(4) {
            pixel[3] = u8::MAX;
        }
    }
    debug!(
        "Rendered {} frame from {}x{} source ({:?})",
        spec,
        source.width(),
        source.height(),
        options.filter
    );
    Ok(RenderedFrame::from_rgba_data(spec, rgba_data))
}

/// Decodes an image from an in-memory buffer, guessing its format from the
/// data.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(data)?)
}

/// Opens and decodes an image file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    Ok(image::open(path)?)
}

//===========================================================================//


//===========================================================================//
