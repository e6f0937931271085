use thiserror::Error;

/// Errors surfaced by persistence collaborators.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[cfg(feature = "sqlite")]
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// A stored row does not satisfy the domain constraints.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
