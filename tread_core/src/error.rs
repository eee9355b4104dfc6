//! Error types shared by every TREAD crate

use thiserror::Error;

/// Result alias used across the TREAD runtime
pub type TreadResult<T> = Result<T, TreadError>;

/// Errors raised by the runtime, configuration and topic layers.
///
/// The per-sample odometry path never produces one of these; they surface at
/// construction time (bad configuration) or from the transport.
#[derive(Debug, Error)]
pub enum TreadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Node '{node}' failed: {message}")]
    Node { node: String, message: String },
}

impl TreadError {
    /// Shorthand for a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        TreadError::Config(message.into())
    }

    /// Shorthand for an error attributed to a named node
    pub fn node<N: Into<String>, S: Into<String>>(node: N, message: S) -> Self {
        TreadError::Node {
            node: node.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TreadError {
    fn from(err: serde_json::Error) -> Self {
        TreadError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for TreadError {
    fn from(err: serde_yaml::Error) -> Self {
        TreadError::Serialization(err.to_string())
    }
}
