use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, UrlRecord, UrlStore};

/// Process-local store with the same uniqueness rules as the MongoDB one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<UrlRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryStore {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.original_url == url).cloned())
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.short_id == short_id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<UrlRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.has_user(user_id)).cloned().collect())
    }

    async fn insert(&self, record: &UrlRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.original_url == record.original_url) {
            return Err(StoreError::Duplicate(format!(
                "originalUrl {}",
                record.original_url
            )));
        }
        if records.iter().any(|r| r.short_id == record.short_id) {
            return Err(StoreError::Duplicate(format!("shortId {}", record.short_id)));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn add_user(&self, short_id: &str, user_id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.short_id == short_id) {
            if !record.has_user(user_id) {
                record.users.push(user_id.to_string());
            }
        }
        Ok(())
    }
}
