//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form,
};

use crate::{
    error::AppResult,
    models::{view::LISTING_PATH, BookFields, Outcome, SearchQuery},
    AppState,
};

/// Home page, forwards to the listing
pub async fn home() -> Redirect {
    Redirect::to(LISTING_PATH)
}

/// First page of the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "First listing page, possibly empty", body = View)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Outcome> {
    state.services.catalog.first_page().await
}

/// One page of the catalog ordered by genre
#[utoipa::path(
    get,
    path = "/books/page/{page}",
    tag = "books",
    params(
        ("page" = String, Path, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Listing page", body = View),
        (status = 303, description = "Page does not exist, redirect to /books")
    )
)]
pub async fn list_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> AppResult<Outcome> {
    state.services.catalog.list_page(Some(&page)).await
}

/// Search title, author, genre and year
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = View)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Outcome> {
    let term = query.q.unwrap_or_default();
    state.services.catalog.search(&term).await
}

/// Empty create form
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    responses(
        (status = 200, description = "New book form", body = View)
    )
)]
pub async fn new_book_form(State(state): State<AppState>) -> Outcome {
    state.services.catalog.new_form()
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books/new",
    tag = "books",
    request_body(content = BookFields, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book created, redirect to /books"),
        (status = 200, description = "Form redisplayed with field errors", body = View)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Form(fields): Form<BookFields>,
) -> AppResult<Outcome> {
    state.services.catalog.create(&fields).await
}

/// Edit form for a book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Update book form", body = View),
        (status = 404, description = "Book not found", body = View)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Outcome> {
    state.services.catalog.show(&id).await
}

/// Update a book
#[utoipa::path(
    post,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body(content = BookFields, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book updated, redirect to /books"),
        (status = 200, description = "Form redisplayed with field errors", body = View),
        (status = 404, description = "Book not found", body = View)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<BookFields>,
) -> AppResult<Outcome> {
    state.services.catalog.update(&id, &fields).await
}

/// Delete a book; deleting a missing book is a no-op
#[utoipa::path(
    post,
    path = "/books/{id}/delete",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Redirect to /books")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Outcome> {
    state.services.catalog.delete(&id).await
}
