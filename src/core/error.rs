//! Error types.
//!
//! Every variant is a configuration error: fatal, returned at construction or
//! encoding time and never retried. Numerical edge cases (sampling round-off)
//! are handled in place and never surface here.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid dimensions or hyperparameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An encoder filled a different number of features than it declares.
    #[error("feature count mismatch: encoder declares {declared}, produced {produced}")]
    FeatureCountMismatch { declared: usize, produced: usize },

    /// Encoder output width does not match the network input layer.
    #[error("encoder produces {encoder} features but the network expects {network}")]
    InputDimMismatch { encoder: usize, network: usize },

    /// A configuration file could not be read or parsed.
    #[error("config: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}
