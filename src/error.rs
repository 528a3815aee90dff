//! Error types for the expense domain.
//!
//! `ValidationError` is the only error a client ever sees; the API layer maps
//! it to a 400 response. `DateParseError` stays inside the domain.

use thiserror::Error;

/// Why a candidate expense was rejected. Display text is the client-facing reason.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid category")]
    InvalidCategory,

    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Invalid date format")]
    InvalidDate,
}

/// Input that `dates::parse_date` could not read as a calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unparseable date: {input:?}")]
pub struct DateParseError {
    pub input: String,
}

impl From<DateParseError> for ValidationError {
    fn from(_: DateParseError) -> Self {
        ValidationError::InvalidDate
    }
}
