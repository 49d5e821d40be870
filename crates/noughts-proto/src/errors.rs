//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding a protocol line.
///
/// None of these are fatal for a connection: the server reports them to the
/// sender and keeps reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// First field is not a tag this side of the connection understands
    #[error("unknown command: {0}")]
    UnknownTag(String),

    /// A required positional field is absent
    #[error("missing field `{field}` in {tag} message")]
    MissingField {
        /// Tag of the message being decoded
        tag: &'static str,
        /// Name of the absent field
        field: &'static str,
    },

    /// A numeric field did not parse as a decimal integer
    #[error("invalid number in field `{field}`: {value:?}")]
    InvalidNumber {
        /// Name of the offending field
        field: &'static str,
        /// Raw field text
        value: String,
    },

    /// Mark field is not `X` or `O`
    #[error("invalid mark: {0:?}")]
    InvalidMark(String),

    /// Board cell is not `-`, `X` or `O`
    #[error("invalid board cell: {0:?}")]
    InvalidCell(String),

    /// Board snapshot has the wrong shape
    #[error("invalid board: expected {expected} {what}, got {actual}")]
    InvalidBoard {
        /// Whether rows or cells were miscounted
        what: &'static str,
        /// Required count
        expected: usize,
        /// Count found on the wire
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let err = ProtocolError::InvalidNumber { field: "row", value: "a".to_string() };
        assert_eq!(err.to_string(), "invalid number in field `row`: \"a\"");

        let err = ProtocolError::MissingField { tag: "JOGADA", field: "col" };
        assert_eq!(err.to_string(), "missing field `col` in JOGADA message");
    }
}
