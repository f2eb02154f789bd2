//! Error types for sqlgram

use crate::grammar::Dialect;
use thiserror::Error;

/// Result type alias for compilation
pub type GrammarResult<T> = Result<T, GrammarError>;

/// Errors raised while building or compiling a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Comparison operator outside the dialect's allowed set
    #[error("Invalid operator '{operator}' for {dialect}")]
    InvalidOperator { operator: String, dialect: Dialect },

    /// Construct the dialect has no syntax for
    #[error("{construct} is not supported by {dialect}")]
    Unsupported {
        dialect: Dialect,
        construct: &'static str,
    },

    /// Builder misuse recorded while the query was assembled
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration parse or validation failure
    #[error("Config error: {0}")]
    Config(String),
}

impl GrammarError {
    /// Create an invalid operator error
    pub fn invalid_operator(operator: impl Into<String>, dialect: Dialect) -> Self {
        Self::InvalidOperator {
            operator: operator.into(),
            dialect,
        }
    }

    /// Create an unsupported construct error
    pub fn unsupported(dialect: Dialect, construct: &'static str) -> Self {
        Self::Unsupported { dialect, construct }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an invalid operator error
    pub fn is_invalid_operator(&self) -> bool {
        matches!(self, Self::InvalidOperator { .. })
    }

    /// Check if this is an unsupported construct error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl From<toml::de::Error> for GrammarError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_dialect() {
        let err = GrammarError::invalid_operator("~~", Dialect::Sqlite);
        assert_eq!(err.to_string(), "Invalid operator '~~' for sqlite");
        assert!(err.is_invalid_operator());

        let err = GrammarError::unsupported(Dialect::Sqlite, "delete with joins");
        assert_eq!(err.to_string(), "delete with joins is not supported by sqlite");
        assert!(err.is_unsupported());
    }
}
