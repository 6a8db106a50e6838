//! Book (catalog entry) model and the field sets submitted by forms.
//!
//! A submission goes through three shapes: [`BookFields`] is the raw, partial
//! input; [`BookDraft`] is the complete text of every field (what the form
//! shows back to the user) and carries the validation rules; [`NewBook`] is
//! the typed value that is actually written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::FieldErrors;

/// Field names in the order errors are reported and forms are laid out
pub const FIELD_ORDER: [&str; 4] = ["title", "author", "genre", "year"];

/// Stored book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields submitted by the create and update forms.
///
/// Every field is optional raw text. On update an absent field keeps the
/// stored value; on create it counts as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

/// Unsaved book exactly as it will be shown on a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate, ToSchema)]
pub struct BookDraft {
    /// Key of the record being edited, absent for a new book
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[validate(custom(function = "not_blank", message = "A book title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "A book author is required"))]
    pub author: String,
    pub genre: String,
    #[validate(custom(function = "whole_number", message = "A book year must be a whole number"))]
    pub year: String,
}

/// Validated field set written to storage
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

fn whole_number(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.parse::<i32>().is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("whole_number"))
}

impl BookDraft {
    /// Draft holding exactly what was submitted, missing fields left empty
    pub fn from_submission(fields: &BookFields) -> Self {
        Self {
            id: None,
            title: fields.title.clone().unwrap_or_default(),
            author: fields.author.clone().unwrap_or_default(),
            genre: fields.genre.clone().unwrap_or_default(),
            year: fields.year.clone().unwrap_or_default(),
        }
    }

    /// Draft of `existing` with the submitted fields applied over it
    pub fn merged(existing: &Book, fields: &BookFields) -> Self {
        let base = Self::from(existing);
        Self {
            id: Some(existing.id),
            title: fields.title.clone().unwrap_or(base.title),
            author: fields.author.clone().unwrap_or(base.author),
            genre: fields.genre.clone().unwrap_or(base.genre),
            year: fields.year.clone().unwrap_or(base.year),
        }
    }

    /// Validate and convert into the value to persist
    pub fn check(&self) -> Result<NewBook, FieldErrors> {
        self.validate().map_err(FieldErrors::from)?;

        let genre = Some(self.genre.clone()).filter(|g| !g.trim().is_empty());
        let year = match self.year.trim() {
            "" => None,
            // validated above
            y => y.parse::<i32>().ok(),
        };

        Ok(NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            genre,
            year,
        })
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }
}
