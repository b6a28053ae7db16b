//! Error types for the bookmark store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot parse bookmark: {0}")]
    InvalidBookmark(String),

    #[error("{0}: duplicate bookmark line")]
    DuplicateBookmark(String),

    #[error("label not found: {0}")]
    LabelNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{error}; closing the label file also failed: {close}")]
    Close {
        error: Box<StoreError>,
        close: std::io::Error,
    },
}

impl StoreError {
    /// Returns true if the error reports an already stored URL.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateBookmark(_))
    }

    /// Returns true if the error reports a missing label.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::LabelNotFound(_) => true,
            StoreError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
