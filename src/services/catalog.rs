//! Catalog service: listing, search and the create/update/delete flow

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{BookDraft, BookFields, BookOrder, Outcome, SearchPredicate, View},
    repository::BookRepository,
};

use super::pagination::{self, PageRequest};

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn BookRepository>,
    page_size: i64,
}

/// Parse a book key from the request path
fn parse_key(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

impl CatalogService {
    pub fn new(repository: Arc<dyn BookRepository>, page_size: i64) -> Self {
        Self {
            repository,
            page_size: page_size.max(1),
        }
    }

    /// First page of the listing. Always renders, even for an empty catalog.
    pub async fn first_page(&self) -> AppResult<Outcome> {
        let request = PageRequest::first(self.page_size);
        let (books, total) = self
            .repository
            .find_and_count(request.offset(), request.limit(), BookOrder::Genre)
            .await?;
        Ok(Outcome::Render(View::index(books, request.pagination(total))))
    }

    /// Requested page of the listing, or a redirect to the landing listing
    /// when the page does not exist
    pub async fn list_page(&self, raw_page: Option<&str>) -> AppResult<Outcome> {
        let number = pagination::parse_page_number(raw_page);
        let Some(request) = PageRequest::new(number, self.page_size) else {
            tracing::debug!(page = number, "Page out of range, redirecting");
            return Ok(Outcome::to_listing());
        };

        let (books, total) = self
            .repository
            .find_and_count(request.offset(), request.limit(), BookOrder::Genre)
            .await?;

        match request.resolve(total) {
            Some(page) => Ok(Outcome::Render(View::index(books, page))),
            None => {
                tracing::debug!(page = number, total, "Page out of range, redirecting");
                Ok(Outcome::to_listing())
            }
        }
    }

    /// Books matching `term` in any searchable field, unpaginated
    pub async fn search(&self, term: &str) -> AppResult<Outcome> {
        let predicate = SearchPredicate::contains(term);
        let books = self
            .repository
            .find_all(Some(predicate), BookOrder::Genre)
            .await?;
        Ok(Outcome::Render(View::search_results(books, term.to_string())))
    }

    pub fn new_form(&self) -> Outcome {
        Outcome::Render(View::new_book(BookDraft::default(), Vec::new()))
    }

    /// Edit form for an existing book
    pub async fn show(&self, raw_id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_key(raw_id) else {
            return Ok(Outcome::NotFound);
        };

        match self.repository.find_by_key(id).await? {
            Some(book) => Ok(Outcome::Render(View::update_book(
                BookDraft::from(&book),
                Vec::new(),
            ))),
            None => Ok(Outcome::NotFound),
        }
    }

    pub async fn create(&self, fields: &BookFields) -> AppResult<Outcome> {
        match self.repository.create(fields).await {
            Ok(book) => {
                tracing::info!(book_id = book.id, "Book created");
                Ok(Outcome::to_listing())
            }
            Err(AppError::Validation(errors)) => {
                tracing::debug!("Book rejected: {}", errors);
                Ok(Outcome::Render(View::new_book(
                    BookDraft::from_submission(fields),
                    errors.0,
                )))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update(&self, raw_id: &str, fields: &BookFields) -> AppResult<Outcome> {
        let Some(id) = parse_key(raw_id) else {
            return Ok(Outcome::NotFound);
        };
        let Some(existing) = self.repository.find_by_key(id).await? else {
            return Ok(Outcome::NotFound);
        };

        match self.repository.update(&existing, fields).await {
            Ok(book) => {
                tracing::info!(book_id = book.id, "Book updated");
                Ok(Outcome::to_listing())
            }
            Err(AppError::Validation(errors)) => {
                tracing::debug!(book_id = id, "Book update rejected: {}", errors);
                Ok(Outcome::Render(View::update_book(
                    BookDraft::merged(&existing, fields),
                    errors.0,
                )))
            }
            // deleted between lookup and write
            Err(AppError::NotFound(_)) => Ok(Outcome::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Delete a book. Unlike update, a missing key is a no-op that still
    /// redirects to the listing.
    pub async fn delete(&self, raw_id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_key(raw_id) else {
            return Ok(Outcome::to_listing());
        };

        match self.repository.find_by_key(id).await? {
            Some(book) => {
                self.repository.delete(&book).await?;
                tracing::info!(book_id = id, "Book deleted");
            }
            None => tracing::debug!(book_id = id, "Delete of missing book ignored"),
        }

        Ok(Outcome::to_listing())
    }

    /// Readiness of the underlying store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
