//! Business logic services

pub mod catalog;
pub mod pagination;

use std::sync::Arc;

use crate::{config::CatalogConfig, repository::BookRepository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services over the given book repository
    pub fn new(repository: Arc<dyn BookRepository>, catalog_config: &CatalogConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository, catalog_config.page_size),
        }
    }
}
