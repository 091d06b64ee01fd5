//! Error types for Groups2BuildingInstructions.
//!
//! Library crates use [`Groups2BiError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for unexpected failures.

use std::path::PathBuf;

/// Top-level error type for all document and configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum Groups2BiError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The input path does not exist.
    #[error("File not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The input file exists but could not be read.
    #[error("Unable to read the input file: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed XML while reading or writing a document.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// The document has no `LXFML` element.
    #[error("Input file is not an LXFML document.")]
    NotLxfml,

    /// The `LXFML` element has no `GroupSystem`.
    #[error("LXFML file does not contain any groups. Unable to generate building instructions.")]
    MissingGroupSystem,
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, Groups2BiError>;

impl Groups2BiError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an XML error from any displayable message.
    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The input file could not be read.
    pub fn read_input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadInput {
            path: path.into(),
            source,
        }
    }

    /// The input file could not be found.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = Groups2BiError::config("bad indent");
        assert_eq!(err.to_string(), "config error: bad indent");

        let err = Groups2BiError::input_not_found("design.lxfml");
        assert_eq!(err.to_string(), "File not found: design.lxfml");

        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let err = Groups2BiError::read_input("design.lxfml", source);
        assert_eq!(
            err.to_string(),
            "Unable to read the input file: stream did not contain valid UTF-8"
        );

        let err = Groups2BiError::xml("unexpected end of file");
        assert!(err.to_string().contains("unexpected end"));
    }

    #[test]
    fn document_errors_match_tool_messages() {
        assert_eq!(
            Groups2BiError::NotLxfml.to_string(),
            "Input file is not an LXFML document."
        );
        assert!(
            Groups2BiError::MissingGroupSystem
                .to_string()
                .starts_with("LXFML file does not contain any groups.")
        );
    }
}
