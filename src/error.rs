//! Error types shared by the coordinate codec and the re-encoding pipeline.

/// Errors that can reach a caller of the codec or the pipeline.
///
/// A failed metadata embed is deliberately absent: it degrades to the
/// un-embedded image and is reported through
/// [`Embedding::FellBack`](crate::pipeline::Embedding::FellBack) instead.
#[derive(Debug, thiserror::Error)]
pub enum GeotagError {
    /// The requested output format is not one of jpeg, jpg, png or webp.
    #[error("unsupported format: {0}. Supported formats: jpeg, jpg, png, webp")]
    UnsupportedFormat(String),

    /// The pixel codec could not parse the source bytes.
    #[error("could not decode image: {0}")]
    ImageDecode(String),

    /// The pixel codec failed to produce the output image.
    #[error("could not encode image: {0}")]
    Encode(String),

    /// A tag directory is present but cannot be read.
    #[error("could not read coordinates: {0}")]
    MalformedDirectory(String),

    /// Latitude or longitude is non-finite or outside its valid range.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

pub type Result<T> = std::result::Result<T, GeotagError>;
