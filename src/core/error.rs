use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WadError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed container: {reason}")]
    Malformed { reason: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unrecognized container type tag {:?}", String::from_utf8_lossy(.0))]
    UnknownKind([u8; 4]),

    #[error("Invalid lump name {0:?}: must be 1-8 bytes")]
    InvalidName(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WadError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        WadError::Malformed {
            reason: reason.into(),
        }
    }

    /// True for errors caused by how the tool was invoked rather than by data.
    pub fn is_usage(&self) -> bool {
        matches!(self, WadError::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, WadError>;
