//! Shape checks for book records.
//!
//! Every rule runs on every submission so the form can show all problems at
//! once; the report is keyed by field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::models::{BookFormData, BookRecord};

/// Lowest publication year accepted.
pub const MIN_PUBLISHED_YEAR: i32 = 1000;
/// Minimum description length, counted after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

static HYPHENATED_ISBN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{3}-[0-9]-[0-9]{2}-[0-9]{6}-[0-9]$").expect("valid ISBN pattern")
});
static PLAIN_ISBN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{13}$").expect("valid ISBN pattern"));

/// Fields a validation message can be attached to, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookField {
    Title,
    Author,
    Isbn,
    PublishedYear,
    Genre,
    Description,
}

impl BookField {
    /// Key used by the serialized record for this field.
    pub fn key(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Isbn => "isbn",
            BookField::PublishedYear => "publishedYear",
            BookField::Genre => "genre",
            BookField::Description => "description",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: BTreeMap<BookField, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn get(&self, field: BookField) -> Option<&str> {
        self.messages.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: BookField) -> bool {
        self.messages.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = BookField> + '_ {
        self.messages.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BookField, &str)> + '_ {
        self.messages
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: BookField, message: impl Into<String>) {
        self.messages.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .messages
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// A form that passed every rule, with the year already unwrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBook {
    form: BookFormData,
    published_year: i32,
}

impl ValidatedBook {
    /// Build the stored record. Blank cover URLs are dropped.
    pub fn into_record(
        self,
        id: String,
        added_date: DateTime<Utc>,
        created_by: Option<String>,
    ) -> BookRecord {
        let cover_image = self
            .form
            .cover_image
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        BookRecord {
            id,
            title: self.form.title,
            author: self.form.author,
            isbn: self.form.isbn,
            published_year: self.published_year,
            genre: self.form.genre,
            description: self.form.description,
            cover_image,
            added_date,
            created_by,
        }
    }
}

/// True when `isbn` has either accepted shape: `NNN-N-NN-NNNNNN-N` or 13 bare
/// digits.
pub fn is_valid_isbn(isbn: &str) -> bool {
    HYPHENATED_ISBN.is_match(isbn) || PLAIN_ISBN.is_match(isbn)
}

/// Run every rule against `form`. `current_year` is the upper bound for the
/// publication year.
pub fn validate_book(
    form: BookFormData,
    current_year: i32,
) -> Result<ValidatedBook, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if form.title.trim().is_empty() {
        errors.insert(BookField::Title, "Title is required");
    }

    if form.author.trim().is_empty() {
        errors.insert(BookField::Author, "Author is required");
    }

    if form.isbn.trim().is_empty() {
        errors.insert(BookField::Isbn, "ISBN is required");
    } else if !is_valid_isbn(&form.isbn) {
        errors.insert(
            BookField::Isbn,
            "ISBN must be in format XXX-X-XX-XXXXXX-X or 13 digits",
        );
    }

    match form.published_year {
        None => errors.insert(BookField::PublishedYear, "Published year is required"),
        Some(year) if !(MIN_PUBLISHED_YEAR..=current_year).contains(&year) => errors.insert(
            BookField::PublishedYear,
            format!("Year must be between {MIN_PUBLISHED_YEAR} and {current_year}"),
        ),
        Some(_) => {}
    }

    if form.genre.trim().is_empty() {
        errors.insert(BookField::Genre, "Genre is required");
    }

    let description = form.description.trim();
    if description.is_empty() {
        errors.insert(BookField::Description, "Description is required");
    } else if description.chars().count() < MIN_DESCRIPTION_CHARS {
        errors.insert(
            BookField::Description,
            format!("Description must be at least {MIN_DESCRIPTION_CHARS} characters"),
        );
    }

    match form.published_year {
        Some(published_year) if errors.is_empty() => Ok(ValidatedBook {
            form,
            published_year,
        }),
        _ => Err(errors),
    }
}
