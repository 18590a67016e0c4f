//! The authoritative book list. Every mutation goes through [`CatalogStore`],
//! which checks ownership and shape, writes the whole catalog back to the
//! blob store, and only then swaps the new list in. A failed write therefore
//! leaves the session exactly where it was.

mod seed;

use std::collections::HashSet;

use chrono::{Datelike, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{BlobStore, CATALOG_KEY};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{BookFormData, BookPatch, BookRecord, GenreCount, UserIdentity};
use crate::validation::validate_book;

pub use seed::{seed_books, SEED_OWNER};

/// Default size of the "recently added" list.
pub const RECENT_LIMIT: usize = 5;
/// Number of records highlighted in the visitor view.
pub const FEATURED_LIMIT: usize = 4;

/// Owns the in-memory catalog and keeps it in sync with a [`BlobStore`].
pub struct CatalogStore<B: BlobStore> {
    store: B,
    books: Vec<BookRecord>,
}

impl<B: BlobStore> CatalogStore<B> {
    /// Hydrate the catalog from `store`. A missing or unreadable blob is
    /// replaced by the seed dataset, which is written back immediately.
    pub fn initialize(store: B) -> CatalogResult<Self> {
        let books = match store.get(CATALOG_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<BookRecord>>(&raw) {
                Ok(books) => {
                    debug!(count = books.len(), "Books loaded from storage");
                    Some(books)
                }
                Err(err) => {
                    warn!("Stored catalog is unreadable, falling back to sample data: {err}");
                    None
                }
            },
            None => None,
        };

        match books {
            Some(books) => Ok(Self { store, books }),
            None => {
                let books = seed_books();
                write_books(&store, &books)?;
                info!(count = books.len(), "Initialized with sample data");
                Ok(Self { store, books })
            }
        }
    }

    /// Copy of every record, most recently added first.
    pub fn list(&self) -> Vec<BookRecord> {
        self.books.clone()
    }

    /// Borrowed view of the catalog in display order.
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<BookRecord> {
        self.books.iter().find(|book| book.id == id).cloned()
    }

    /// Validate `form` and prepend it as a new record owned by `author`.
    pub fn add(&mut self, form: BookFormData, author: &str) -> CatalogResult<BookRecord> {
        let validated = validate_book(form, current_year()).map_err(CatalogError::Validation)?;
        let book = validated.into_record(self.next_id(), Utc::now(), Some(author.to_string()));

        let mut staged = Vec::with_capacity(self.books.len() + 1);
        staged.push(book.clone());
        staged.extend(self.books.iter().cloned());
        self.commit(staged)?;

        info!(id = %book.id, title = %book.title, "Book added");
        Ok(book)
    }

    /// Merge `patch` into the record `id`. Only the record's creator may do
    /// this; `id`, `added_date` and `created_by` are never touched.
    pub fn update(
        &mut self,
        id: &str,
        patch: BookPatch,
        requester: &str,
    ) -> CatalogResult<BookRecord> {
        let index = self.owned_index(id, requester)?;
        let current = &self.books[index];

        let merged = current.to_form().merge(patch);
        let validated = validate_book(merged, current_year()).map_err(CatalogError::Validation)?;
        let book = validated.into_record(
            current.id.clone(),
            current.added_date,
            current.created_by.clone(),
        );

        let mut staged = self.books.clone();
        staged[index] = book.clone();
        self.commit(staged)?;

        info!(id = %book.id, title = %book.title, "Book updated");
        Ok(book)
    }

    /// Remove the record `id` if `requester` created it.
    pub fn delete(&mut self, id: &str, requester: &str) -> CatalogResult<()> {
        let index = self.owned_index(id, requester)?;

        let mut staged = self.books.clone();
        let removed = staged.remove(index);
        self.commit(staged)?;

        info!(id = %removed.id, title = %removed.title, "Book deleted");
        Ok(())
    }

    /// Distinct genres, sorted ascending.
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .books
            .iter()
            .map(|book| book.genre.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        genres.sort();
        genres
    }

    /// Book count per genre, largest first. Equal counts keep the order in
    /// which the genre first shows up in the catalog.
    pub fn genre_counts(&self) -> Vec<GenreCount> {
        let mut counts: Vec<GenreCount> = Vec::new();
        for book in &self.books {
            match counts.iter_mut().find(|entry| entry.genre == book.genre) {
                Some(entry) => entry.count += 1,
                None => counts.push(GenreCount {
                    genre: book.genre.clone(),
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    pub fn distinct_author_count(&self) -> usize {
        self.books
            .iter()
            .map(|book| book.author.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// The `limit` newest records by `added_date`; ties keep catalog order.
    pub fn recent(&self, limit: usize) -> Vec<BookRecord> {
        let mut books = self.books.clone();
        books.sort_by(|a, b| b.added_date.cmp(&a.added_date));
        books.truncate(limit);
        books
    }

    pub fn featured(&self) -> Vec<BookRecord> {
        self.recent(FEATURED_LIMIT)
    }

    /// Position of `id`, provided `requester` owns it.
    fn owned_index(&self, id: &str, requester: &str) -> CatalogResult<usize> {
        let Some(index) = self.books.iter().position(|book| book.id == id) else {
            warn!(id, "Book not found");
            return Err(CatalogError::NotFound(id.to_string()));
        };

        if !is_owner(&self.books[index], requester) {
            warn!(id, requester, "Refusing change by non-owner");
            return Err(CatalogError::NotOwner {
                id: id.to_string(),
                requester: requester.to_string(),
            });
        }

        Ok(index)
    }

    /// Persist `staged` and adopt it only once the write went through.
    fn commit(&mut self, staged: Vec<BookRecord>) -> CatalogResult<()> {
        if let Err(err) = write_books(&self.store, &staged) {
            warn!("Catalog write failed, keeping previous state: {err}");
            return Err(err);
        }
        self.books = staged;
        Ok(())
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.books.iter().any(|book| book.id == id) {
                return id;
            }
        }
    }
}

/// Whether `identity` may edit or delete `book`. Records without a creator
/// are read-only, as is everything for visitors.
pub fn can_edit(book: &BookRecord, identity: Option<&UserIdentity>) -> bool {
    identity.is_some_and(|identity| is_owner(book, &identity.name))
}

fn is_owner(book: &BookRecord, requester: &str) -> bool {
    book.created_by.as_deref() == Some(requester)
}

fn write_books<B: BlobStore>(store: &B, books: &[BookRecord]) -> CatalogResult<()> {
    let raw = serde_json::to_string(books)?;
    store.set(CATALOG_KEY, &raw)?;
    Ok(())
}

fn current_year() -> i32 {
    Utc::now().year()
}
