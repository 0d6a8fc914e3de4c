//! Error types for graph-to-Terraform generation.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the codegen error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole operation.
///
/// Only structurally invalid input and configuration problems land here.
/// Problems with an individual node never do: they are reported as
/// [`crate::GenerationWarning`]s and the node is skipped.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The graph snapshot is not shaped like `{ nodes: [...], edges: [...] }`.
    #[error("Invalid graph input: {message}")]
    #[diagnostic(
        code(infragraph::invalid_input),
        help("The snapshot must be a JSON object whose `nodes` and `edges` fields are arrays")
    )]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(infragraph::config_not_found))]
    ConfigNotFound {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration {path}: {message}")]
    #[diagnostic(
        code(infragraph::config_parse_error),
        help("Supported keys are `ordering`, `name_tag_key` and `[default_tags]`")
    )]
    ConfigParse {
        /// Path to the configuration file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Serialization error.
    #[error("JSON error: {0}")]
    #[diagnostic(code(infragraph::json_error))]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    #[diagnostic(code(infragraph::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid-input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Failure while emitting the blocks of a single node.
///
/// The generator catches these, records a warning and moves on to the next
/// node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// A property value could not be interpreted for its field type.
    #[error("property `{field}`: {message}")]
    InvalidProperty {
        /// Property name
        field: String,
        /// What was wrong with the value
        message: String,
    },
}

impl EmitError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidProperty {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let error = Error::invalid_input("`nodes` is not an array");
        assert_eq!(
            error.to_string(),
            "Invalid graph input: `nodes` is not an array"
        );
    }

    #[test]
    fn test_json_error_from() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
        assert!(error.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_emit_error_display() {
        let error = EmitError::invalid("memory_size", "expected a number, got an object");
        assert_eq!(
            error.to_string(),
            "property `memory_size`: expected a number, got an object"
        );
    }
}
