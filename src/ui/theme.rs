use ratatui::style::{Color, Style};
use tracing::warn;

use crate::db::{BlobStore, THEME_KEY};
use crate::error::StorageError;

/// Light/dark preference, remembered in the blob store as `light` / `dark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored preference, defaulting to light when unset or unreadable.
    pub fn load<B: BlobStore>(store: &B) -> Self {
        match store.get(THEME_KEY) {
            Ok(Some(value)) if value == "dark" => Theme::Dark,
            Ok(_) => Theme::Light,
            Err(err) => {
                warn!("Could not read theme preference: {err}");
                Theme::Light
            }
        }
    }

    pub fn save<B: BlobStore>(self, store: &B) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.as_str())
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Base style painted behind every screen.
    pub(crate) fn base(self) -> Style {
        match self {
            Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
            Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
        }
    }

    /// Accent used for titles, key hints and the active form field.
    pub(crate) fn accent(self) -> Color {
        match self {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::Yellow,
        }
    }

    /// De-emphasized text such as placeholders and hints.
    pub(crate) fn muted(self) -> Color {
        match self {
            Theme::Light => Color::DarkGray,
            Theme::Dark => Color::Gray,
        }
    }
}
