//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while reading or writing model files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Parse error in {source_name}: {message}")]
    ParseError { source_name: String, message: String },

    #[error("Write error: {message}")]
    WriteError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for facetview_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Io(io) => facetview_core::Error::Io(io),
            IoError::FileNotFound { path } => facetview_core::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path),
            )),
            e @ IoError::ParseError { .. } => facetview_core::Error::Parse(e.to_string()),
            IoError::WriteError { message } => facetview_core::Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message,
            )),
        }
    }
}
