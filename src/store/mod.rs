//! Keyed document store for endpoint records.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::Endpoint;

pub use memory::MemoryEndpointStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    /// A unique key (`id` or `path`) is already taken.
    DuplicateKey(String),
    Corrupt(String),
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::DuplicateKey(key) => write!(f, "duplicate key: {key}"),
            StoreError::Corrupt(msg) => write!(f, "corrupt record: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let key = match db_err.constraint() {
                    Some(c) if c.contains("path") => "path",
                    _ => "id",
                };
                StoreError::DuplicateKey(key.to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// Persistence for endpoints. Soft-deleted records are returned by every finder;
/// deciding what a deleted record means is the caller's job.
#[async_trait]
pub trait EndpointStore: Send + Sync {
    /// All records in creation order.
    async fn find_all(&self) -> Result<Vec<Endpoint>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Endpoint, StoreError>;

    async fn find_by_path(&self, path: &str) -> Result<Endpoint, StoreError>;

    /// Fails with [`StoreError::DuplicateKey`] when the id or path is taken.
    async fn insert(&self, endpoint: Endpoint) -> Result<Endpoint, StoreError>;

    /// Replaces the mutable fields of a live record. `id`, `path` and `created_at`
    /// are never rewritten. Returns [`StoreError::NotFound`] if the record is
    /// missing or already deleted.
    async fn update_by_id(&self, id: Uuid, endpoint: Endpoint) -> Result<Endpoint, StoreError>;
}
