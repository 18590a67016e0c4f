use std::cmp::min;

use crate::models::BookRecord;
use crate::query::{CatalogQuery, GenreFilter};

/// The browsable list: current query, the records it selects, and the cursor.
#[derive(Default)]
pub(crate) struct CatalogScreen {
    pub(crate) query: CatalogQuery,
    pub(crate) visible: Vec<BookRecord>,
    pub(crate) genres: Vec<String>,
    pub(crate) selected: usize,
    pub(crate) total: usize,
}

impl CatalogScreen {
    pub(crate) fn new(books: &[BookRecord], genres: Vec<String>) -> Self {
        let mut screen = Self::default();
        screen.refresh(books, genres, None);
        screen
    }

    /// Recompute the visible records after the catalog or the query changed,
    /// keeping the cursor on `focus_id` when it is still visible.
    pub(crate) fn refresh(
        &mut self,
        books: &[BookRecord],
        genres: Vec<String>,
        focus_id: Option<&str>,
    ) {
        let previous = focus_id
            .map(str::to_string)
            .or_else(|| self.current_book().map(|book| book.id.clone()));

        self.genres = genres;
        self.total = books.len();
        self.visible = self.query.apply(books);

        if let Some(id) = previous {
            if let Some(index) = self.visible.iter().position(|book| book.id == id) {
                self.selected = index;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    /// Step the genre filter through `all` followed by each known genre.
    pub(crate) fn cycle_genre(&mut self, books: &[BookRecord], offset: isize) {
        let options = self.genres.len() as isize + 1;
        let current = match &self.query.genre {
            GenreFilter::All => 0,
            GenreFilter::Genre(genre) => self
                .genres
                .iter()
                .position(|known| known == genre)
                .map(|index| index as isize + 1)
                .unwrap_or(0),
        };
        let next = (current + offset).rem_euclid(options);
        self.query.genre = if next == 0 {
            GenreFilter::All
        } else {
            GenreFilter::Genre(self.genres[next as usize - 1].clone())
        };
        let genres = self.genres.clone();
        self.refresh(books, genres, None);
    }

    pub(crate) fn set_search(&mut self, books: &[BookRecord], text: String) {
        self.query.text = text;
        let genres = self.genres.clone();
        self.refresh(books, genres, None);
    }

    pub(crate) fn clear_filters(&mut self, books: &[BookRecord]) {
        self.query = CatalogQuery::default();
        let genres = self.genres.clone();
        self.refresh(books, genres, None);
    }

    pub(crate) fn current_book(&self) -> Option<&BookRecord> {
        self.visible.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            self.selected = 0;
            return;
        }
        let max_index = self.visible.len() as isize - 1;
        let next = (self.selected as isize + offset).clamp(0, max_index);
        self.selected = next as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        self.selected = min(self.selected, self.visible.len().saturating_sub(1));
    }
}
