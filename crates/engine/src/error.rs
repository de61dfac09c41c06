//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidPeriod`] returned when a month/date token is malformed or a
//!   range is inverted.
//! - [`InvalidRequest`] returned when a request carries nothing to do, such
//!   as an update without fields.
//! - [`KeyNotFound`] returned when an item is missing or belongs to another
//!   owner.
//! - [`Database`] returned when the store fails; it carries the store's
//!   message.
//!
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
//!  [`InvalidRequest`]: EngineError::InvalidRequest
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("data access error: {0}")]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidRequest(a), Self::InvalidRequest(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
