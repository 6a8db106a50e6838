//! Postgres-backed book repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDraft, BookFields, BookOrder, SearchPredicate},
};

const BOOK_COLUMNS: &str = "id, title, author, genre, year, created_at, updated_at";

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_all(
        &self,
        filter: Option<SearchPredicate>,
        order: BookOrder,
    ) -> AppResult<Vec<Book>> {
        let books = match filter {
            Some(predicate) => {
                let query = format!(
                    r#"
                    SELECT {}
                    FROM books
                    WHERE title LIKE $1
                       OR author LIKE $1
                       OR genre LIKE $1
                       OR CAST(year AS TEXT) LIKE $1
                    ORDER BY {}
                    "#,
                    BOOK_COLUMNS,
                    order.as_sql()
                );
                sqlx::query_as::<_, Book>(&query)
                    .bind(predicate.like_pattern())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("SELECT {} FROM books ORDER BY {}", BOOK_COLUMNS, order.as_sql());
                sqlx::query_as::<_, Book>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(books)
    }

    async fn find_and_count(
        &self,
        offset: i64,
        limit: i64,
        order: BookOrder,
    ) -> AppResult<(Vec<Book>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "SELECT {} FROM books ORDER BY {} LIMIT $1 OFFSET $2",
            BOOK_COLUMNS,
            order.as_sql()
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    async fn find_by_key(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn create(&self, fields: &BookFields) -> AppResult<Book> {
        let book = BookDraft::from_submission(fields).check()?;
        let now = Utc::now();

        let query = format!(
            r#"
            INSERT INTO books (title, author, genre, year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let created = sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(book.year)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(&self, existing: &Book, fields: &BookFields) -> AppResult<Book> {
        let book = BookDraft::merged(existing, fields).check()?;
        let now = Utc::now();

        let query = format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, genre = $3, year = $4, updated_at = $5
            WHERE id = $6
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(book.year)
            .bind(now)
            .bind(existing.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", existing.id)))
    }

    async fn delete(&self, existing: &Book) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(existing.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
