use sqlx::{Pool, Postgres};
use thiserror::Error;

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("pool", &"Pool<Postgres>")
            .field("size", &self.pool.size())
            .finish()
    }
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("real estate with this slug already exists")]
    DuplicateSlug,

    #[error("user with this email already exists")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Maps a unique-constraint violation onto `conflict`, every other failure
/// onto `StoreError::Database`.
pub(crate) fn map_unique_violation(err: sqlx::Error, conflict: StoreError) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            tracing::warn!(error = ?err, "unique constraint rejected write");
            return conflict;
        }
    }
    StoreError::Database(err)
}
