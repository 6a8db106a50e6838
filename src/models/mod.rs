//! Data models for Bookshelf

pub mod book;
pub mod search;
pub mod view;

// Re-export commonly used types
pub use book::{Book, BookDraft, BookFields, NewBook};
pub use search::{BookOrder, SearchPredicate, SearchQuery};
pub use view::{Outcome, View, ViewName, ViewPayload};
