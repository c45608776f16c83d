//! Error types for docstitch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docstitch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reassembling or chunking a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not exist.
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input file is not a supported document model.
    #[error("Unsupported input: {}", .0.display())]
    UnsupportedInput(PathBuf),

    /// The document model JSON could not be parsed.
    #[error("Invalid document model: {0}")]
    InvalidModel(String),

    /// An item references a table or picture that does not exist.
    #[error("Dangling {kind} reference {index} (document has {count})")]
    DanglingReference {
        /// "table" or "picture"
        kind: &'static str,
        /// Referenced index
        index: usize,
        /// Number of entries available
        count: usize,
    },

    /// The tokenizer could not be loaded.
    #[error("Tokenizer unavailable: {0}")]
    TokenizerLoad(String),

    /// Encoding or decoding tokens failed.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Chunking or rendering options are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An image payload could not be decoded.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidModel(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputNotFound(PathBuf::from("missing.json"));
        assert_eq!(err.to_string(), "Input not found: missing.json");

        let err = Error::DanglingReference {
            kind: "table",
            index: 4,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Dangling table reference 4 (document has 2)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::InvalidModel(_)));
    }
}
