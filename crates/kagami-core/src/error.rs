use thiserror::Error;

/// Errors that can occur while building or configuring the Kagami engine.
///
/// Parsing and matching never produce these: an unrecognized name is a
/// `ParsedRelease` with `success == false`, and an unrelated show is simply
/// `false` from `is_match`.
#[derive(Debug, Error)]
pub enum KagamiError {
    /// The input string is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// A string is not the canonical description of any quality.
    #[error("unknown quality description: {description:?}")]
    UnknownQuality {
        /// The description that could not be resolved.
        description: String,
    },

    /// The parser configuration contains an unusable value.
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for Kagami operations.
pub type Result<T> = std::result::Result<T, KagamiError>;
