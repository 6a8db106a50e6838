//! Bookshelf book catalog
//!
//! Lists, paginates, searches, creates, updates and deletes book records
//! stored in Postgres. Handlers return views as structured JSON payloads for
//! an external renderer.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state over an already constructed book repository
    pub fn new(config: AppConfig, repository: Arc<dyn repository::BookRepository>) -> Self {
        let services = services::Services::new(repository, &config.catalog);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
