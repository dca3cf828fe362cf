#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//===========================================================================//

// Directory entries store each dimension in a single byte, with 0 standing
// in for 256.
pub(crate) const MIN_DIMENSION: u32 = 1;
pub(crate) const MAX_DIMENSION: u32 = 256;

/// The frame sizes written when no other sizes are configured.
pub const DEFAULT_SIZES: [FrameSpec; 5] = [
    FrameSpec::new(16, 16),
    FrameSpec::new(24, 24),
    FrameSpec::new(32, 32),
    FrameSpec::new(48, 48),
    FrameSpec::new(256, 256),
];

/// Frames at least this wide or tall are stored as PNG by default.
pub const DEFAULT_COMPRESSED_MIN_SIZE: u32 = 256;

//===========================================================================//

/// The target size of one frame in an icon.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct FrameSpec {
    width: u32,
    height: u32,
}

impl FrameSpec {
    /// Creates a new frame spec.  The dimensions are not checked here; a
    /// frame outside of 1 to 256 pixels in either dimension is rejected when
    /// it is rendered.
    pub const fn new(width: u32, height: u32) -> FrameSpec {
        FrameSpec { width, height }
    }

    /// Creates a square frame spec.
    pub const fn square(size: u32) -> FrameSpec {
        FrameSpec::new(size, size)
    }

    /// Returns the target width, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the target height, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if both dimensions can be stored in an ICO directory
    /// entry.
    pub fn is_valid(&self) -> bool {
        (MIN_DIMENSION..=MAX_DIMENSION).contains(&self.width)
            && (MIN_DIMENSION..=MAX_DIMENSION).contains(&self.height)
    }

    /// Returns the width as stored in a directory entry (256 becomes 0).
    pub(crate) fn width_byte(&self) -> u8 {
        (self.width % 256) as u8
    }

    /// Returns the height as stored in a directory entry (256 becomes 0).
    pub(crate) fn height_byte(&self) -> u8 {
        (self.height % 256) as u8
    }
}

impl fmt::Display for FrameSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}x{}", self.width, self.height)
    }
}

/// The error returned when parsing a `FrameSpec` from a string fails.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Invalid frame size {input:?} ({reason})")]
pub struct ParseFrameSpecError {
    input: String,
    reason: &'static str,
}

impl FromStr for FrameSpec {
    type Err = ParseFrameSpecError;

    /// Parses either `"WIDTHxHEIGHT"` (e.g. `"48x32"`) or a single number
    /// for a square frame (e.g. `"48"`).
    fn from_str(input: &str) -> Result<FrameSpec, ParseFrameSpecError> {
        let error = |reason| ParseFrameSpecError {
            input: input.to_string(),
            reason,
        };
        let parse = |text: &str| {
            text.trim().parse::<u32>().map_err(|_| error("not a number"))
        };
        let spec = match input.split_once(['x', 'X']) {
            Some((width, height)) => {
                FrameSpec::new(parse(width)?, parse(height)?)
            }
            None => FrameSpec::square(parse(input)?),
        };
        if !spec.is_valid() {
            return Err(error("each dimension must be between 1 and 256"));
        }
        Ok(spec)
    }
}

//===========================================================================//

/// The resampling filter used when resizing the source image.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ResizeFilter {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Linear (tent) filter.
    Triangle,
    /// Cubic filter.
    CatmullRom,
    /// Gaussian filter.
    Gaussian,
    /// Lanczos with a window of 3.
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    pub(crate) fn filter_type(&self) -> image::imageops::FilterType {
        use image::imageops::FilterType;
        match *self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// What to do with the source image's alpha channel.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum AlphaMode {
    /// Keep transparency as-is.
    #[default]
    Keep,
    /// Make every pixel fully opaque.  Frames are still stored at 32 bpp.
    Remove,
}

//===========================================================================//

/// Settings for building an icon.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodeOptions {
    /// The frames to write, in directory order.
    pub sizes: Vec<FrameSpec>,
    /// The filter used to resize the source for each frame.
    pub filter: ResizeFilter,
    /// Whether to keep the source's transparency.
    pub alpha: AlphaMode,
    /// Frames at least this wide or tall are stored as PNG; all others as
    /// uncompressed bitmaps.
    pub compressed_min_size: u32,
}

impl EncodeOptions {
    /// Replaces the list of frame sizes.
    pub fn with_sizes<I>(mut self, sizes: I) -> EncodeOptions
    where
        I: IntoIterator<Item = FrameSpec>,
    {
        self.sizes = sizes.into_iter().collect();
        self
    }

    /// Sets the resampling filter.
    pub fn with_filter(mut self, filter: ResizeFilter) -> EncodeOptions {
        self.filter = filter;
        self
    }

    /// Sets the alpha handling mode.
    pub fn with_alpha(mut self, alpha: AlphaMode) -> EncodeOptions {
        self.alpha = alpha;
        self
    }

    /// Sets the size at which frames switch to PNG storage.
    pub fn with_compressed_min_size(mut self, size: u32) -> EncodeOptions {
        self.compressed_min_size = size;
        self
    }

    /// Returns true if a frame of the given size should be stored as PNG.
    pub(crate) fn use_compressed(&self, spec: FrameSpec) -> bool {
        spec.width() >= self.compressed_min_size
            || spec.height() >= self.compressed_min_size
    }
}

impl Default for EncodeOptions {
    fn default() -> EncodeOptions {
        EncodeOptions {
            sizes: DEFAULT_SIZES.to_vec(),
            filter: ResizeFilter::default(),
            alpha: AlphaMode::default(),
            compressed_min_size: DEFAULT_COMPRESSED_MIN_SIZE,
        }
    }
}

//===========================================================================//


//===========================================================================//
