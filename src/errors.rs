//! Submodule defining the errors used across the crate.

use alloc::string::String;
use alloc::vec::Vec;

/// Errors that can occur while rewriting the placeholders of a query.
///
/// Unterminated literals, comments and quoting forms are not errors: the
/// scanner consumes them to the end of the input and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No placeholder format was supplied.
    #[error("A placeholder format is required to rewrite named parameters")]
    FormatFunctionRequired,

    /// A `:name` sequence does not follow the selector grammar.
    #[error("Invalid placeholder name '{name}' at position {offset}")]
    InvalidPlaceholderName {
        /// The raw name following the colon.
        name: String,
        /// Byte offset of the colon in the input.
        offset: usize,
    },
}

/// Crate-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Rewriting a query failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A selector does not follow the `name(.name|[digits])*` grammar.
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    /// The dialect name is not one of the supported dialects.
    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),

    /// The cardinality is not one of `one`, `many`, `one?` or `many?`.
    #[error("Invalid cardinality '{0}'")]
    InvalidCardinality(String),

    /// The row type is not recognized.
    #[error("Invalid row type '{0}'")]
    InvalidRowType(String),

    /// The data type is not recognized.
    #[error("Invalid data type '{0}'")]
    InvalidDataType(String),

    /// One or more result column data types are not recognized.
    #[error("Invalid result column data types: {}", .0.join(", "))]
    InvalidColumnDataTypes(Vec<String>),

    /// No value was found for a parameter.
    #[cfg(feature = "json")]
    #[error("No value found for parameter '{0}'")]
    MissingValue(String),
}
