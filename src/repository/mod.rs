//! Persistence collaborator contract and its implementations.
//!
//! The lifecycle engine only talks to persistence through [`ContentReader`]
//! and [`ContentWriter`]; the in-memory projection is seeded from
//! [`ContentReader::list_contents`] once and afterwards follows confirmed
//! writes.

use async_trait::async_trait;

use crate::domain::content::Content;
use crate::domain::types::ContentId;

pub mod errors;

#[cfg(feature = "sqlite")]
pub mod content;

pub use errors::{RepositoryError, RepositoryResult};

#[cfg(feature = "sqlite")]
use crate::db::{DbConnection, DbPool};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be shared between the binary and tests.
///
/// Diesel calls are blocking and run inline inside the async trait methods.
/// This suits the current-thread runtime of the `grilla` binary; on a
/// multi-threaded runtime wrap the calls in `spawn_blocking` instead.
#[cfg(feature = "sqlite")]
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

#[cfg(feature = "sqlite")]
impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for scheduled content.
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Full snapshot of the persisted content, used to seed the store.
    async fn list_contents(&self) -> RepositoryResult<Vec<Content>>;
}

/// Write operations for scheduled content.
#[async_trait]
pub trait ContentWriter: Send + Sync {
    /// Insert or replace a record, keyed by its id.
    async fn upsert_content(&self, content: &Content) -> RepositoryResult<usize>;
    /// Delete a record by id. Deleting a missing id affects zero rows.
    async fn delete_content(&self, id: ContentId) -> RepositoryResult<usize>;
}
