use range_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or compiling a syntax definition.
pub enum SyntaxDefinitionError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("field '{0}' must not be empty")]
    /// A marker field was present but empty.
    EmptyField(&'static str),

    #[error("empty keyword in syntax '{0}'")]
    /// The keyword list contains an empty entry.
    EmptyKeyword(String),

    #[error("pattern error: {0}")]
    /// A generated pass pattern failed to compile.
    Pattern(#[from] EngineError),
}
