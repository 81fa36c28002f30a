//! Error types for the range engine.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the range engine.
///
/// "Empty query" and "no matches" are not errors; see
/// [`FindOutcome`](crate::find::FindOutcome).
pub enum EngineError {
    #[error("invalid pattern '{pattern}': {message}")]
    /// A scan pattern failed to compile.
    InvalidPattern {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// The compiler error message.
        message: String,
    },

    #[error("config parse error: {0}")]
    /// YAML configuration could not be parsed.
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed while loading configuration.
    Io(#[from] std::io::Error),

    #[error("document processor failed: {0}")]
    /// A [`DocumentProcessor`](crate::processing::DocumentProcessor) returned an error.
    Processor(String),
}
