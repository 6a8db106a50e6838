//! HTTP routing for Bookshelf

pub mod books;
pub mod health;
pub mod openapi;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    response::{IntoResponse, Response},
    routing::{get, post},
    BoxError, Router,
};
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::Outcome, AppState};

/// Catch-all for paths no route matched
pub async fn not_found() -> Response {
    Outcome::NotFound.into_response()
}

/// Turn middleware failures into the generic error response
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Internal("Request deadline exceeded".to_string())
    } else {
        AppError::Internal(format!("Unhandled middleware error: {}", err))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/", get(books::home))
        .route("/books", get(books::list_books))
        .route("/books/page/:page", get(books::list_page))
        .route("/books/search", get(books::search_books))
        .route("/books/new", get(books::new_book_form).post(books::create_book))
        .route("/books/:id", get(books::get_book).post(books::update_book))
        .route("/books/:id/delete", post(books::delete_book))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
