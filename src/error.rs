//! Error types shared across the crate.

use thiserror::Error;

/// Why an expression could not be compiled or evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("Function is required")]
    Empty,
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

/// Failures of the key-value storage backing the history log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the model-backed analysis flows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no language model is configured")]
    NotConfigured,
    #[error("model request failed: {0}")]
    Model(String),
    #[error("model returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("{0}")]
    Validation(String),
}

/// Failures while loading or saving the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
