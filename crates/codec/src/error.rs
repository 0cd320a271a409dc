use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unsupported image format: payload is neither PNG nor SVG")]
    UnsupportedFormat,

    #[error("metadata serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
