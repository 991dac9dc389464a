use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod models;
pub mod mongo;

pub use memory::MemoryStore;
pub use models::UrlRecord;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A write hit the uniqueness rule on `originalUrl` or `shortId`.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Backend(#[from] mongodb::error::Error),
}

/// The collection of [`UrlRecord`]s backing the registry.
#[async_trait]
pub trait UrlStore: Send + Sync {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError>;

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Every record whose `users` contains `user_id`, in insertion order.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<UrlRecord>, StoreError>;

    async fn insert(&self, record: &UrlRecord) -> Result<(), StoreError>;

    /// Adds `user_id` to the record's users unless it is already there.
    async fn add_user(&self, short_id: &str, user_id: &str) -> Result<(), StoreError>;

    /// Releases the underlying client. Called once, after the server stops.
    async fn close(&self) {}
}
