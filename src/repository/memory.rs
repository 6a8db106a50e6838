//! In-memory book repository, used by tests and the `memory` storage backend

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDraft, BookFields, BookOrder, NewBook, SearchPredicate},
};

#[derive(Default)]
struct Store {
    next_id: i32,
    books: BTreeMap<i32, Book>,
}

#[derive(Clone, Default)]
pub struct InMemoryBookRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already validated book, bypassing form handling
    pub async fn insert(&self, book: NewBook) -> Book {
        let mut store = self.store.write().await;
        store.next_id += 1;
        let now = Utc::now();
        let created = Book {
            id: store.next_id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            year: book.year,
            created_at: now,
            updated_at: now,
        };
        store.books.insert(created.id, created.clone());
        created
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.books.len()
    }
}

/// Sort in place the way the Postgres repository orders rows
fn sort_books(books: &mut [Book], order: BookOrder) {
    match order {
        // stable: ties stay in key order, absent genres last
        BookOrder::Genre => books.sort_by(|a, b| match (&a.genre, &b.genre) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_all(
        &self,
        filter: Option<SearchPredicate>,
        order: BookOrder,
    ) -> AppResult<Vec<Book>> {
        let store = self.store.read().await;
        let mut books: Vec<Book> = store
            .books
            .values()
            .filter(|b| filter.as_ref().map_or(true, |p| p.matches(b)))
            .cloned()
            .collect();
        sort_books(&mut books, order);
        Ok(books)
    }

    async fn find_and_count(
        &self,
        offset: i64,
        limit: i64,
        order: BookOrder,
    ) -> AppResult<(Vec<Book>, i64)> {
        if offset < 0 || limit < 0 {
            return Err(AppError::Internal(format!(
                "Invalid window offset={} limit={}",
                offset, limit
            )));
        }

        let books = self.find_all(None, order).await?;
        let total = books.len() as i64;
        let window = books
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((window, total))
    }

    async fn find_by_key(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.store.read().await.books.get(&id).cloned())
    }

    async fn create(&self, fields: &BookFields) -> AppResult<Book> {
        let book = BookDraft::from_submission(fields).check()?;
        Ok(self.insert(book).await)
    }

    async fn update(&self, existing: &Book, fields: &BookFields) -> AppResult<Book> {
        let book = BookDraft::merged(existing, fields).check()?;

        let mut store = self.store.write().await;
        let stored = store
            .books
            .get_mut(&existing.id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", existing.id)))?;
        stored.title = book.title;
        stored.author = book.author;
        stored.genre = book.genre;
        stored.year = book.year;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, existing: &Book) -> AppResult<()> {
        self.store.write().await.books.remove(&existing.id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
