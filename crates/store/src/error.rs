use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unsupported figure extension in '{0}': expected .png or .svg")]
    UnsupportedExtension(String),

    #[error("invalid figure name '{0}'")]
    InvalidFigureName(String),

    #[error("codec error: {0}")]
    Codec(#[from] refig_codec::CodecError),

    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer error: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
