//! API integration tests

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use reqwest::Client;
use serde_json::Value;
use tower::ServiceExt;

use bookshelf_server::{
    api::create_router,
    models::{Book, BookFields, BookOrder, NewBook, SearchPredicate},
    repository::{BookRepository, InMemoryBookRepository},
    AppConfig, AppResult, AppState,
};

const BASE_URL: &str = "http://localhost:3000";

/// Router over an in-memory store holding `count` books
async fn app_with_books(count: usize) -> (Router, InMemoryBookRepository) {
    let repo = InMemoryBookRepository::new();
    for i in 0..count {
        repo.insert(NewBook {
            title: format!("Book {}", i),
            author: format!("Author {}", i),
            genre: Some(format!("Genre {:02}", i)),
            year: Some(2000 + i as i32),
        })
        .await;
    }
    let state = AppState::new(AppConfig::default(), Arc::new(repo.clone()));
    (create_router(state), repo)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Option<String>, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, location, body)
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app_with_books(0).await;
    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_home_redirects_to_listing() {
    let (app, _) = app_with_books(0).await;
    let (status, location, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));
}

#[tokio::test]
async fn test_listing_page() {
    let (app, _) = app_with_books(15).await;
    let (status, _, body) = get(&app, "/books/page/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "index");
    assert_eq!(body["books"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["offset"], 10);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["pagination"]["total_count"], 15);
}

#[tokio::test]
async fn test_out_of_range_page_redirects() {
    let (app, _) = app_with_books(15).await;
    for uri in ["/books/page/0", "/books/page/3", "/books/page/-1", "/books/page/x"] {
        let (status, location, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location.as_deref(), Some("/books"));
        assert_eq!(body, Value::Null);
    }
}

#[tokio::test]
async fn test_empty_catalog_landing_renders_without_loop() {
    let (app, _) = app_with_books(0).await;
    let (status, location, _) = get(&app, "/books/page/1").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));

    let (status, _, body) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["total_pages"], 0);
}

#[tokio::test]
async fn test_search() {
    let (app, _) = app_with_books(4).await;

    let (status, _, body) = get(&app, "/books/search?q=Genre%2003").await;
    assert_eq!(status, StatusCode::OK);
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Book 3");
    assert_eq!(body["query"], "Genre 03");

    let (_, _, body) = get(&app, "/books/search?q=").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 4);

    let (_, _, body) = get(&app, "/books/search").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 4);

    let (_, _, body) = get(&app, "/books/search?q=%25").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_new_book_form() {
    let (app, _) = app_with_books(0).await;
    let (status, _, body) = get(&app, "/books/new").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "new-book");
    assert_eq!(body["book"]["title"], "");
}

#[tokio::test]
async fn test_create_and_fetch_book() {
    let (app, repo) = app_with_books(0).await;

    let (status, location, _) = post_form(
        &app,
        "/books/new",
        "title=Middlemarch&author=George+Eliot&genre=Novel&year=1871",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));
    assert_eq!(repo.len().await, 1);

    let (status, _, body) = get(&app, "/books/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "update-book");
    assert_eq!(body["book"]["id"], 1);
    assert_eq!(body["book"]["title"], "Middlemarch");
    assert_eq!(body["book"]["author"], "George Eliot");
    assert_eq!(body["book"]["genre"], "Novel");
    assert_eq!(body["book"]["year"], "1871");
}

#[tokio::test]
async fn test_create_invalid_book_redisplays_form() {
    let (app, repo) = app_with_books(0).await;

    let (status, location, body) =
        post_form(&app, "/books/new", "title=&author=George+Eliot&genre=Novel&year=1871").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(location, None);
    assert_eq!(body["view"], "new-book");
    assert_eq!(body["book"]["author"], "George Eliot");
    assert_eq!(body["book"]["genre"], "Novel");
    assert_eq!(body["book"]["year"], "1871");
    assert_eq!(body["errors"][0]["field"], "title");
    assert_eq!(body["errors"][0]["message"], "A book title is required");
    assert_eq!(repo.len().await, 0);
}

#[tokio::test]
async fn test_update_book() {
    let (app, repo) = app_with_books(1).await;

    let (status, location, _) =
        post_form(&app, "/books/1", "title=Renamed&author=Author+0&genre=&year=").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));

    let (_, _, body) = get(&app, "/books/1").await;
    assert_eq!(body["book"]["title"], "Renamed");
    assert_eq!(body["book"]["genre"], "");
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_update_invalid_book_redisplays_form() {
    let (app, _) = app_with_books(1).await;

    let (status, _, body) = post_form(&app, "/books/1", "title=Kept&author=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "update-book");
    assert_eq!(body["book"]["id"], 1);
    assert_eq!(body["book"]["title"], "Kept");
    assert_eq!(body["errors"][0]["message"], "A book author is required");
}

#[tokio::test]
async fn test_update_missing_book_is_not_found() {
    let (app, _) = app_with_books(1).await;
    let (status, _, body) = post_form(&app, "/books/42", "title=T&author=A").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["view"], "page-not-found");

    let (status, _, _) = get(&app, "/books/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_book_is_idempotent() {
    let (app, repo) = app_with_books(2).await;

    let (status, location, _) = post_form(&app, "/books/1/delete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));
    assert_eq!(repo.len().await, 1);

    let (status, location, _) = post_form(&app, "/books/1/delete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_unknown_route_renders_not_found() {
    let (app, _) = app_with_books(0).await;
    let (status, _, body) = get(&app, "/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["view"], "page-not-found");
    assert_eq!(body["err"]["message"], "That page does not exist, please go back.");
    assert_eq!(body["err"]["status"], 404);
}

/// Store that never answers a listing query in time
struct StalledRepository;

#[async_trait]
impl BookRepository for StalledRepository {
    async fn find_all(
        &self,
        _filter: Option<SearchPredicate>,
        _order: BookOrder,
    ) -> AppResult<Vec<Book>> {
        Ok(Vec::new())
    }

    async fn find_and_count(
        &self,
        _offset: i64,
        _limit: i64,
        _order: BookOrder,
    ) -> AppResult<(Vec<Book>, i64)> {
        tokio::time::sleep(Duration::from_secs(120)).await;
        Ok((Vec::new(), 0))
    }

    async fn find_by_key(&self, _id: i32) -> AppResult<Option<Book>> {
        Ok(None)
    }

    async fn create(&self, _fields: &BookFields) -> AppResult<Book> {
        unreachable!("listing only")
    }

    async fn update(&self, _existing: &Book, _fields: &BookFields) -> AppResult<Book> {
        unreachable!("listing only")
    }

    async fn delete(&self, _existing: &Book) -> AppResult<()> {
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_request_past_deadline_renders_error_view() {
    let mut config = AppConfig::default();
    config.server.request_timeout_secs = 1;
    let app = create_router(AppState::new(config, Arc::new(StalledRepository)));

    let (status, _, body) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["view"], "error");
    assert_eq!(body["message"], "Something went wrong on our side");
}

#[tokio::test]
#[ignore] // Run against a live server with: cargo test -- --ignored
async fn test_live_listing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].is_array());
    assert!(body["pagination"]["total_count"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_live_create_and_delete_book() {
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client");

    let response = client
        .post(format!("{}/books/new", BASE_URL))
        .form(&[
            ("title", "Live Test Book"),
            ("author", "Integration"),
            ("genre", "Testing"),
            ("year", "2024"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 303);

    let response = client
        .get(format!("{}/books/search?q=Live%20Test%20Book", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["books"][0]["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/books/{}/delete", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 303);
}
