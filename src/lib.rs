//! A library for encoding raster images into multi-resolution ICO files.
//!
//! Each requested frame size is rendered from the source image, packaged
//! as either an uncompressed bitmap or (for the largest frames) a PNG, and
//! laid out in a single ICO container:
//!
//! ```no_run
//! let source = image2ico::open("logo.png")?;
//! let bytes = image2ico::encode_icon(&source, &image2ico::DEFAULT_SIZES)?;
//! std::fs::write("logo.ico", bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bmp;
mod config;
mod error;
mod icondir;
mod package;
mod render;

pub use crate::config::{
    AlphaMode, EncodeOptions, FrameSpec, ParseFrameSpecError, ResizeFilter,
    DEFAULT_COMPRESSED_MIN_SIZE, DEFAULT_SIZES,
};
pub use crate::error::{Error, Result};
pub use crate::icondir::{
    assemble, DirectoryEntry, IconDir, IconDirEntry, ENTRY_LEN, HEADER_LEN,
};
pub use crate::package::{package, EncodedPayload, SubFormat};
pub use crate::render::{decode, open, render, RenderedFrame};

use image::DynamicImage;
use log::debug;
use std::io::Write;

//===========================================================================//

/// Builds ICO files from source images according to a set of options.
#[derive(Clone, Debug, Default)]
pub struct IconEncoder {
    options: EncodeOptions,
}

impl IconEncoder {
    /// Creates an encoder with the given options.
    pub fn new(options: EncodeOptions) -> IconEncoder {
        IconEncoder { options }
    }

    /// Returns the options this encoder was created with.
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes `source` into a complete ICO file, with one frame per
    /// configured size.  Fails without producing any output if any frame
    /// fails.
    pub fn encode(&self, source: &DynamicImage) -> Result<Vec<u8>> {
        let sizes = &self.options.sizes;
        debug!(
            "Encoding {}x{} source into {} frames",
            source.width(),
            source.height(),
            sizes.len()
        );
        let mut payloads = Vec::<EncodedPayload>::with_capacity(sizes.len());
        for &spec in sizes.iter() {
            let frame = render(source, spec, &self.options)?;
            payloads.push(package(&frame, &self.options)?);
        }
        assemble(sizes, &payloads)
    }

    /// Encodes `source` and writes the finished ICO file to `writer`.
    /// Nothing is written unless encoding succeeds.
    pub fn write<W: Write>(
        &self,
        source: &DynamicImage,
        mut writer: W,
    ) -> Result<()> {
        let data = self.encode(source)?;
        writer.write_all(&data)?;
        writer.flush()?;
        Ok(())
    }
}

/// Encodes `source` into an ICO file with one frame per entry of `sizes`,
/// in that order, using the default options otherwise.
pub fn encode_icon(source: &DynamicImage, sizes: &[FrameSpec]) -> Result<Vec<u8>> {
    let options = EncodeOptions::default().with_sizes(sizes.iter().cloned());
    IconEncoder::new(options).encode(source)
}

//===========================================================================//


//===========================================================================//
