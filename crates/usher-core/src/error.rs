//! # Format Errors
//!
//! Input-validation failures for the boundary types in this crate. A
//! [`FormatError`] means the input never reached any admission logic: a
//! malformed code is rejected before ticket lookup and consumes nothing.
//!
//! Format errors are deliberately a separate category from admission
//! denials and from ledger failures. Gate staff handling "this string is
//! not a ticket code" need a different response than "this ticket was
//! denied entry".

use thiserror::Error;

/// Errors produced when constructing a validated boundary type.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The ticket code does not match the `PREFIX-YYYY-NNN` shape.
    #[error("malformed ticket code {0:?}: expected PREFIX-YYYY-NNN")]
    InvalidTicketCode(String),

    /// The operator identifier is empty, too long, or contains
    /// non-printable or whitespace characters.
    #[error("invalid operator id {0:?}")]
    InvalidOperatorId(String),

    /// The timestamp string could not be parsed, or used a non-UTC offset
    /// on the strict parse path.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
