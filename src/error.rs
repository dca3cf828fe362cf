use crate::config::FrameSpec;
use std::io;

//===========================================================================//

/// The error type for icon encoding.
///
/// Any error on any frame aborts the whole encode; no partial container is
/// ever produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source image could not be decoded or resized.
    #[error("Failed to render frame: {0}")]
    Render(String),

    /// A rendered frame could not be serialized into its sub-format.
    #[error("Failed to encode {spec} frame: {source}")]
    Encode {
        /// The frame that failed to encode.
        spec: FrameSpec,
        /// The underlying codec or I/O error.
        #[source]
        source: io::Error,
    },

    /// An internal contract was broken.  This indicates a bug in the caller
    /// or in this crate, never a recoverable runtime condition.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// The finished icon could not be written out.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<image::ImageError> for Error {
    fn from(error: image::ImageError) -> Error {
        Error::Render(error.to_string())
    }
}

/// A specialized `Result` type for icon encoding.
pub type Result<T> = std::result::Result<T, Error>;

//===========================================================================//


//===========================================================================//
