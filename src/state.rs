use std::sync::Arc;

use crate::{
    db::UrlStore,
    registry::{ShortLinks, UrlRegistry},
};

#[derive(Clone)]
pub struct AppState {
    pub registry: UrlRegistry,
}

impl AppState {
    pub fn new(store: Arc<dyn UrlStore>, links: ShortLinks) -> Self {
        Self {
            registry: UrlRegistry::new(store, links),
        }
    }
}
