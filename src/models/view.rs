//! Handler outcomes and the view payloads handed to the renderer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::book::{Book, BookDraft};
use crate::{error::FieldError, services::pagination::Pagination};

/// Landing listing, also the target of every successful mutation
pub const LISTING_PATH: &str = "/books";

pub const NOT_FOUND_MESSAGE: &str = "That page does not exist, please go back.";

/// Views the renderer knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViewName {
    Index,
    NewBook,
    UpdateBook,
    PageNotFound,
    /// Generic failure page
    Error,
}

/// Not-found details shown on the `page-not-found` view
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NotFoundDetails {
    pub message: String,
    pub status: u16,
}

/// Data passed to a view
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ViewPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<NotFoundDetails>,
}

/// A view name plus its payload
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct View {
    pub view: ViewName,
    #[serde(flatten)]
    pub payload: ViewPayload,
}

impl View {
    /// One page of the listing
    pub fn index(books: Vec<Book>, pagination: Pagination) -> Self {
        Self {
            view: ViewName::Index,
            payload: ViewPayload {
                title: Some("Books".to_string()),
                books: Some(books),
                pagination: Some(pagination),
                ..Default::default()
            },
        }
    }

    /// Unpaginated search results, shown with the listing view
    pub fn search_results(books: Vec<Book>, query: String) -> Self {
        Self {
            view: ViewName::Index,
            payload: ViewPayload {
                title: Some("Search Results".to_string()),
                books: Some(books),
                query: Some(query),
                ..Default::default()
            },
        }
    }

    pub fn new_book(book: BookDraft, errors: Vec<FieldError>) -> Self {
        Self {
            view: ViewName::NewBook,
            payload: ViewPayload {
                title: Some("New Book".to_string()),
                book: Some(book),
                errors,
                ..Default::default()
            },
        }
    }

    pub fn update_book(book: BookDraft, errors: Vec<FieldError>) -> Self {
        Self {
            view: ViewName::UpdateBook,
            payload: ViewPayload {
                title: Some("Update Book".to_string()),
                book: Some(book),
                errors,
                ..Default::default()
            },
        }
    }

    pub fn page_not_found() -> Self {
        Self {
            view: ViewName::PageNotFound,
            payload: ViewPayload {
                title: Some("Page Not Found".to_string()),
                err: Some(NotFoundDetails {
                    message: NOT_FOUND_MESSAGE.to_string(),
                    status: StatusCode::NOT_FOUND.as_u16(),
                }),
                ..Default::default()
            },
        }
    }
}

/// What a catalog operation asks the routing layer to do
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Redirect to the given path; nothing is rendered
    Redirect(String),
    /// Render a view with status 200
    Render(View),
    /// The requested book does not exist
    NotFound,
}

impl Outcome {
    pub fn to_listing() -> Self {
        Outcome::Redirect(LISTING_PATH.to_string())
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Redirect(path) => Redirect::to(&path).into_response(),
            Outcome::Render(view) => view.into_response(),
            Outcome::NotFound => {
                (StatusCode::NOT_FOUND, View::page_not_found()).into_response()
            }
        }
    }
}
