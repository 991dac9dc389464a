use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    db::{StoreError, UrlRecord, UrlStore},
    error::RegistryError,
    types::UserUrl,
    utils::{generate_short_id, present},
};

const MAX_INSERT_ATTEMPTS: usize = 3;

/// Builds the public link strings handed back to callers.
///
/// Links for an already registered URL use `base_url` with a `/s/`
/// separator; new links and per-user listings use `redirect_url` followed
/// directly by `s/`. Deployments are expected to configure `redirect_url`
/// with a trailing slash and `base_url` without one.
#[derive(Debug, Clone)]
pub struct ShortLinks {
    base_url: String,
    redirect_url: String,
}

impl ShortLinks {
    pub fn new(base_url: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            redirect_url: redirect_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, &config.redirect_url)
    }

    pub fn existing(&self, short_id: &str) -> String {
        format!("{}/s/{}", self.base_url, short_id)
    }

    pub fn fresh(&self, short_id: &str) -> String {
        format!("{}s/{}", self.redirect_url, short_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub short_id: String,
    pub shortened_url: String,
    /// `true` when this call created the record.
    pub created: bool,
}

#[derive(Clone)]
pub struct UrlRegistry {
    store: Arc<dyn UrlStore>,
    links: ShortLinks,
}

impl UrlRegistry {
    pub fn new(store: Arc<dyn UrlStore>, links: ShortLinks) -> Self {
        Self { store, links }
    }

    /// Finds or creates the record for `url` and attributes it to `user_id`.
    pub async fn shorten(
        &self,
        url: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Shortened, RegistryError> {
        let (Some(url), Some(user_id)) = (present(url), present(user_id)) else {
            return Err(RegistryError::InvalidRequest("URL and userId are required"));
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            if let Some(existing) = self.store.find_by_original_url(url).await? {
                return self.attribute(existing, user_id).await;
            }

            let record =
                UrlRecord::new(generate_short_id(), url.to_string(), user_id.to_string());
            match self.store.insert(&record).await {
                Ok(()) => {
                    info!(short_id = %record.short_id, user_id, "Created short URL");
                    return Ok(Shortened {
                        shortened_url: self.links.fresh(&record.short_id),
                        short_id: record.short_id,
                        created: true,
                    });
                }
                Err(StoreError::Duplicate(detail)) if attempt < MAX_INSERT_ATTEMPTS => {
                    warn!(attempt, %detail, "Insert conflicted, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn attribute(
        &self,
        record: UrlRecord,
        user_id: &str,
    ) -> Result<Shortened, RegistryError> {
        if record.has_user(user_id) {
            debug!(short_id = %record.short_id, user_id, "User already attributed");
        } else {
            self.store.add_user(&record.short_id, user_id).await?;
            info!(short_id = %record.short_id, user_id, "Attributed existing short URL");
        }
        Ok(Shortened {
            shortened_url: self.links.existing(&record.short_id),
            short_id: record.short_id,
            created: false,
        })
    }

    /// Every URL `user_id` has shortened, with its public link.
    pub async fn list_user_urls(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<UserUrl>, RegistryError> {
        let user_id =
            present(user_id).ok_or(RegistryError::InvalidRequest("userId is required"))?;

        let records = self.store.find_by_user(user_id).await?;
        if records.is_empty() {
            return Err(RegistryError::NotFound("No URLs found for this user"));
        }

        Ok(records
            .into_iter()
            .map(|record| UserUrl {
                shortened_url: self.links.fresh(&record.short_id),
                original_url: record.original_url,
            })
            .collect())
    }

    pub async fn resolve(&self, short_id: &str) -> Result<String, RegistryError> {
        self.store
            .find_by_short_id(short_id)
            .await?
            .map(|record| record.original_url)
            .ok_or(RegistryError::NotFound("Short URL not found"))
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}
