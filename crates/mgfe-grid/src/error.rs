//! Error types for mgfe-grid

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unsupported element type: {0}")]
    UnsupportedElementType(String),

    #[error("unknown vertex set: {0}")]
    UnknownVertexSet(String),

    #[error("unknown element set: {0}")]
    UnknownElementSet(String),

    #[error("invalid grid: {0}")]
    Invalid(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GridError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        GridError::Parse {
            line,
            message: message.into(),
        }
    }
}
