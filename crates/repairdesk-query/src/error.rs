//! Error types for the query crate.
//!
//! Running a query never fails. These errors come from parsing user input
//! into query state and from collection mutations.

use thiserror::Error;

/// Errors raised while building query state or mutating a collection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Sort direction was neither `asc` nor `desc`.
    #[error("invalid sort direction '{0}', expected asc or desc")]
    InvalidDirection(String),

    /// Sort expression had no field name.
    #[error("invalid sort '{0}', expected field or field:dir")]
    InvalidSort(String),

    /// Filter expression was not of the form `field=value`.
    #[error("invalid filter '{0}', expected field=value")]
    InvalidFilter(String),

    /// A record with this id already exists in the collection.
    #[error("record '{0}' already exists")]
    DuplicateId(String),

    /// No record with this id exists in the collection.
    #[error("record '{0}' not found")]
    NotFound(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
