//! Domain models that get persisted to the blob store and passed throughout
//! the front end. The types stay light-weight data holders; the catalog owns
//! the rules and the UI owns presentation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder cover palette. A record without a cover gets one of these picked
/// by the length of its title.
const COVER_COLORS: [&str; 6] = ["6366f1", "8b5cf6", "ec4899", "3b82f6", "10b981", "f59e0b"];
/// How much of the title is baked into the placeholder image text.
const COVER_TEXT_CHARS: usize = 20;

/// A single catalog entry. Field names serialize in camelCase so blobs written
/// by the web client load as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Opaque identifier assigned by the catalog on creation.
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
    pub genre: String,
    pub description: String,
    /// Optional cover URL. Blank strings count as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub added_date: DateTime<Utc>,
    /// Name of the contributor who created the record. Legacy records may not
    /// carry one, which makes them read-only for everybody.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl BookRecord {
    /// Cover to show for this record: the stored URL when present, otherwise a
    /// placeholder derived from the title.
    pub fn cover_url(&self) -> String {
        match self.cover_image.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => placeholder_cover_url(&self.title),
        }
    }

    /// Editable view of the record, used to seed edit forms and to merge
    /// partial updates.
    pub fn to_form(&self) -> BookFormData {
        BookFormData {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            published_year: Some(self.published_year),
            genre: self.genre.clone(),
            description: self.description.clone(),
            cover_image: self.cover_image.clone(),
        }
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.author)
    }
}

/// Placeholder image for a title: the color comes from `title.len() mod 6`
/// (counted in chars) and the first 20 chars are URL-encoded into the text.
pub fn placeholder_cover_url(title: &str) -> String {
    let color = COVER_COLORS[title.chars().count() % COVER_COLORS.len()];
    let text: String = title.chars().take(COVER_TEXT_CHARS).collect();
    format!(
        "https://placehold.co/300x450/{color}/ffffff?text={}",
        urlencoding::encode(&text)
    )
}

/// The user-editable subset of a record. `published_year` is optional so a
/// missing year can be reported instead of silently defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFormData {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: Option<i32>,
    pub genre: String,
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl BookFormData {
    /// Overlay every field present in `patch`.
    pub fn merge(mut self, patch: BookPatch) -> Self {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(isbn) = patch.isbn {
            self.isbn = isbn;
        }
        if let Some(year) = patch.published_year {
            self.published_year = year;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(cover) = patch.cover_image {
            self.cover_image = cover;
        }
        self
    }
}

/// Partial update for an existing record. `published_year` and `cover_image`
/// are doubly optional: `Some(None)` clears the value, `None` leaves it
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<Option<i32>>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<Option<String>>,
}

impl From<BookFormData> for BookPatch {
    /// Replace every field, the shape submitted by a full edit form.
    fn from(form: BookFormData) -> Self {
        Self {
            title: Some(form.title),
            author: Some(form.author),
            isbn: Some(form.isbn),
            published_year: Some(form.published_year),
            genre: Some(form.genre),
            description: Some(form.description),
            cover_image: Some(form.cover_image),
        }
    }
}

/// Role attached to a signed-in identity. Older stored identities used `user`
/// for contributors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(alias = "user")]
    Contributor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Contributor => write!(f, "contributor"),
        }
    }
}

/// The signed-in user as reported by the auth service. Only `name` takes part
/// in ownership checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(alias = "username")]
    pub name: String,
    pub role: Role,
}

/// Aggregate row for the dashboard's per-genre breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}
