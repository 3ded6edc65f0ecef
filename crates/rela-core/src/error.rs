//! Error types for the RELA field engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required input column is absent. Fatal for the whole table:
    /// the deriver produces no partial output when this is raised.
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    /// Table structure is malformed (ragged rows, duplicate column names).
    #[error("schema error: {0}")]
    Schema(String),

    /// CSV input could not be decoded into a table.
    #[error("CSV decode error: {0}")]
    Csv(String),

    /// A single frame failed to rasterize. Carries the frame index so a
    /// partially-failed run can be diagnosed without re-running.
    #[error("frame {frame_index} failed to rasterize: {message}")]
    Render { frame_index: usize, message: String },

    /// The animated-artifact writer failed for the named artifact.
    #[error("failed to assemble '{artifact}': {message}")]
    Assembly { artifact: String, message: String },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid input (parameters, table contents).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e.to_string())
    }
}
