//! Unit parsing errors.

use thiserror::Error;

/// A unit expression could not be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("empty unit expression")]
    Empty,

    #[error("unknown unit symbol '{0}'")]
    UnknownSymbol(String),

    #[error("invalid exponent in '{0}'")]
    InvalidExponent(String),

    /// A `/` with nothing to divide by.
    #[error("dangling operator in '{0}'")]
    DanglingOperator(String),

    /// The part after `since` is not a date.
    #[error("invalid reference time '{0}'")]
    InvalidReference(String),

    /// `<unit> since <date>` where `<unit>` is not a time unit.
    #[error("'{0}' is not a time unit and cannot have a reference epoch")]
    ReferenceNotTime(String),
}
