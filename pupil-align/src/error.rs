//! Error types for the pupil alignment pipeline.
//!
//! Every failure is surfaced to the caller unchanged; no module performs
//! local recovery or substitutes defaults for a failed lookup or an empty
//! detection mask.

use thiserror::Error;

/// Errors produced by pupil detection, synthesis and collection handling.
#[derive(Error, Debug)]
pub enum PupilError {
    /// A metadata field is still at its unset sentinel where a real value
    /// is required.
    #[error("metadata key '{key}' is unset and has no usable value")]
    MissingMetadata { key: &'static str },

    /// No station parameters are configured for an instrument position and
    /// the record carries no override.
    #[error("no station parameters configured for instrument position {position}")]
    UnresolvedConfig { position: i64 },

    /// The detection mask selected zero pixels. Raised from both centroid
    /// estimation and synthesis instead of letting the division produce NaN.
    #[error("detection mask contains no pixels above threshold")]
    EmptyMask,

    /// Image and mask dimensions disagree at the centroid seam.
    #[error("image shape {image:?} does not match mask shape {mask:?}")]
    ShapeMismatch {
        image: (usize, usize),
        mask: (usize, usize),
    },

    /// A pupil frame could not be read or written. Not retried here; any
    /// retry policy belongs to the caller.
    #[error("pupil frame access failed: {0}")]
    SourceRead(#[from] crate::io::FrameError),

    /// Filesystem error while enumerating sources or loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern handed to collection loading does not parse.
    #[error("invalid source pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A station configuration file does not parse.
    #[error("failed to parse config table: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
