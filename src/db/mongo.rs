use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, IndexModel,
};
use tracing::{debug, info};

use super::{StoreError, UrlRecord, UrlStore};
use crate::config::Config;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    urls: Collection<UrlRecord>,
}

impl MongoStore {
    /// Connects, pings the server and makes sure the unique indexes exist.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db = client.database(&config.mongo_db);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database = %config.mongo_db, "Connected to MongoDB");

        let store = Self {
            urls: db.collection(&config.mongo_collection),
            client,
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = || IndexOptions::builder().unique(true).build();
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "originalUrl": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "shortId": 1 })
                .options(unique())
                .build(),
        ];
        self.urls.create_indexes(indexes).await?;
        debug!("Unique indexes on originalUrl and shortId ensured");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UrlStore for MongoStore {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.urls.find_one(doc! { "originalUrl": url }).await?)
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.urls.find_one(doc! { "shortId": short_id }).await?)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<UrlRecord>, StoreError> {
        let cursor = self.urls.find(doc! { "users": user_id }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, record: &UrlRecord) -> Result<(), StoreError> {
        match self.urls.insert_one(record).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(e.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn add_user(&self, short_id: &str, user_id: &str) -> Result<(), StoreError> {
        self.urls
            .update_one(
                doc! { "shortId": short_id },
                doc! { "$addToSet": { "users": user_id } },
            )
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}
