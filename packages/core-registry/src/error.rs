//! Error types for the registry.

use crate::scalar::ScalarKind;

/// Errors reported by registry operations.
///
/// Errors are `Clone` so a failed population can be reported to every caller
/// that touches the same record type afterwards.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The name was never registered for the record type.
    #[error("unknown field '{field}' on {record}")]
    UnknownField { record: &'static str, field: String },

    /// The incoming value cannot be converted to the field's scalar type.
    #[error("type mismatch for field '{field}' on {record}: expected {expected}, got {got}")]
    TypeMismatch {
        record: &'static str,
        field: String,
        expected: ScalarKind,
        got: &'static str,
    },

    /// The external value behind a shared field is already borrowed elsewhere.
    #[error("shared value behind field '{field}' on {record} is already borrowed")]
    SharedBorrowed { record: &'static str, field: String },

    /// The same name was registered twice under `DuplicatePolicy::Reject`.
    #[error("field '{field}' registered twice on {record}")]
    DuplicateField { record: &'static str, field: String },

    /// The field name is not a valid identifier.
    #[error("invalid field name '{field}' on {record}: {message}")]
    InvalidFieldName {
        record: &'static str,
        field: String,
        message: String,
    },

    /// A registry slot holds a table for a different record type.
    ///
    /// Slots are keyed by `TypeId`, so this never happens under correct use.
    #[error("registry slot for {record} is corrupted")]
    Corrupted { record: &'static str },
}

impl Error {
    /// The record type the error refers to.
    pub fn record(&self) -> &'static str {
        match self {
            Error::UnknownField { record, .. }
            | Error::TypeMismatch { record, .. }
            | Error::SharedBorrowed { record, .. }
            | Error::DuplicateField { record, .. }
            | Error::InvalidFieldName { record, .. }
            | Error::Corrupted { record } => record,
        }
    }
}

/// Failure of a single assign or read, before the field is known.
///
/// Returned by [`Accessor::assign`](crate::Accessor::assign) and
/// [`Accessor::read`](crate::Accessor::read). The registry attaches the record
/// and field name with [`AccessError::at`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    #[error("expected {expected}, got {got}")]
    TypeMismatch {
        expected: ScalarKind,
        got: &'static str,
    },

    #[error("shared value is already borrowed")]
    SharedBorrowed,
}

impl AccessError {
    /// Attach the record and field this failure happened on.
    pub fn at(self, record: &'static str, field: &str) -> Error {
        match self {
            AccessError::TypeMismatch { expected, got } => Error::TypeMismatch {
                record,
                field: field.to_string(),
                expected,
                got,
            },
            AccessError::SharedBorrowed => Error::SharedBorrowed {
                record,
                field: field.to_string(),
            },
        }
    }
}
