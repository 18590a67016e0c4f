//! Search and genre filtering over a catalog snapshot. Nothing here mutates or
//! persists; the result keeps the input order.

use std::fmt;

use crate::models::BookRecord;

/// Value the genre picker uses for "no genre restriction".
pub const ALL_GENRES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreFilter {
    #[default]
    All,
    Genre(String),
}

impl GenreFilter {
    /// Interpret a picker value, where `"all"` lifts the restriction.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == ALL_GENRES {
            GenreFilter::All
        } else {
            GenreFilter::Genre(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, GenreFilter::All)
    }

    fn matches(&self, book: &BookRecord) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Genre(genre) => book.genre == *genre,
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => f.write_str(ALL_GENRES),
            GenreFilter::Genre(genre) => f.write_str(genre),
        }
    }
}

/// Search text plus genre restriction, as held by the catalog view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub text: String,
    pub genre: GenreFilter,
}

impl CatalogQuery {
    pub fn new(text: impl Into<String>, genre: GenreFilter) -> Self {
        Self {
            text: text.into(),
            genre,
        }
    }

    /// No search text and no genre restriction.
    pub fn is_unfiltered(&self) -> bool {
        self.text.trim().is_empty() && self.genre.is_all()
    }

    pub fn apply(&self, books: &[BookRecord]) -> Vec<BookRecord> {
        filter_books(books, &self.text, &self.genre)
    }
}

/// Records whose title, author or genre contains `search` ignoring case, or
/// whose ISBN contains it verbatim, restricted to `genre`. Blank search text
/// matches every record.
pub fn filter_books(books: &[BookRecord], search: &str, genre: &GenreFilter) -> Vec<BookRecord> {
    if search.trim().is_empty() && genre.is_all() {
        return books.to_vec();
    }

    let needle = search.to_lowercase();
    let any_text = search.trim().is_empty();

    books
        .iter()
        .filter(|book| any_text || matches_text(book, search, &needle))
        .filter(|book| genre.matches(book))
        .cloned()
        .collect()
}

fn matches_text(book: &BookRecord, raw: &str, lowered: &str) -> bool {
    book.title.to_lowercase().contains(lowered)
        || book.author.to_lowercase().contains(lowered)
        || book.genre.to_lowercase().contains(lowered)
        || book.isbn.contains(raw)
}
