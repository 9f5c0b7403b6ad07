use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid free range {start:#x}..{end:#x}: {message}")]
    InvalidRange {
        start: usize,
        end: usize,
        message: String,
    },

    #[error("No space left for relocation: {needed} byte(s) needed, image limit is {limit:#x}")]
    OutOfSpace { needed: usize, limit: usize },

    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is the fatal "relocation space exhausted" error
    pub fn is_out_of_space(&self) -> bool {
        matches!(self, Error::OutOfSpace { .. })
    }
}
