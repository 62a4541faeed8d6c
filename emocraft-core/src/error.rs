//! Error types for the emotion crafting core.

use thiserror::Error;

/// Top-level error type for all emocraft operations.
///
/// Data-quality problems in a rule table (duplicate pairs, unreachable
/// emotions, cycles) are not errors. They are reported through
/// [`crate::builder::BuildReport`].
#[derive(Error, Debug)]
pub enum EmocraftError {
    /// Structural argument error: empty or duplicate base list, empty name.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The combination rule data could not be parsed.
    #[error("Rule table error: {0}")]
    RuleTable(String),

    /// The dimension data could not be parsed or holds unknown values.
    #[error("Dimension table error: {0}")]
    DimensionTable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Progress snapshot (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, EmocraftError>;
