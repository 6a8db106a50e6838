//! Repository layer for book storage

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, BookFields, BookOrder, SearchPredicate},
};

pub use books::PgBookRepository;
pub use memory::InMemoryBookRepository;

/// Storage for book records.
///
/// `create` and `update` validate the submitted fields before writing and
/// report rejected fields as `AppError::Validation`. Every other failure is a
/// persistence error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books matching `filter` (every book when `None`)
    async fn find_all(
        &self,
        filter: Option<SearchPredicate>,
        order: BookOrder,
    ) -> AppResult<Vec<Book>>;

    /// One window of the ordered catalog and the total number of books
    async fn find_and_count(
        &self,
        offset: i64,
        limit: i64,
        order: BookOrder,
    ) -> AppResult<(Vec<Book>, i64)>;

    async fn find_by_key(&self, id: i32) -> AppResult<Option<Book>>;

    async fn create(&self, fields: &BookFields) -> AppResult<Book>;

    /// Merge `fields` into `existing` and persist the result
    async fn update(&self, existing: &Book, fields: &BookFields) -> AppResult<Book>;

    async fn delete(&self, existing: &Book) -> AppResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}
