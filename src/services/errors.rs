use thiserror::Error;

use crate::domain::content::Content;

/// Errors returned by the lifecycle engine.
///
/// None of them is fatal: the in-memory store is left consistent with what
/// persistence confirmed, and the caller may retry the user action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// A persistence call failed; nothing was changed.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    /// The old record of a relocation was deleted but the new one could not
    /// be written. The record is no longer persisted anywhere.
    #[error(
        "content {} was deleted from its old slot but could not be stored at {} after {attempts} attempts",
        content.id,
        content.slot_key
    )]
    OrphanedRelocation {
        /// The record as it should have been stored.
        content: Box<Content>,
        attempts: u32,
    },
    /// The request lacked a target or carried invalid data. No persistence
    /// call was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
