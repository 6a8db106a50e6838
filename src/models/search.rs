//! Free-text search over the catalog

use serde::Deserialize;
use utoipa::IntoParams;

use super::book::Book;

/// Search query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Term looked up in title, author, genre and year
    pub q: Option<String>,
}

/// Ordering applied to listing and search results.
///
/// Genre is not unique, so rows sharing a genre have no stable order across
/// pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookOrder {
    #[default]
    Genre,
}

impl BookOrder {
    /// SQL `ORDER BY` expression
    pub fn as_sql(&self) -> &'static str {
        match self {
            BookOrder::Genre => "genre ASC NULLS LAST",
        }
    }
}

/// Substring match of one term against title, author, genre or year.
///
/// The empty term matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPredicate {
    term: String,
}

impl SearchPredicate {
    pub fn contains(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }

    /// `LIKE` pattern for the term, with wildcard characters escaped so they
    /// match literally. Always bound as a parameter, never spliced into SQL.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.term.len() + 2);
        pattern.push('%');
        for c in self.term.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    /// Evaluate the predicate against an in-memory book
    pub fn matches(&self, book: &Book) -> bool {
        let term = self.term.as_str();
        book.title.contains(term)
            || book.author.contains(term)
            || book.genre.as_deref().is_some_and(|g| g.contains(term))
            || book.year.is_some_and(|y| y.to_string().contains(term))
    }
}
