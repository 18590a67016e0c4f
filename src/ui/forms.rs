use chrono::{Datelike, Utc};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{BookFormData, BookRecord};
use crate::validation::{BookField, ValidationErrors};

/// Longest year the form accepts.
const MAX_YEAR_DIGITS: usize = 4;

/// Fields of the book form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum BookFormField {
    #[default]
    Title,
    Author,
    Isbn,
    PublishedYear,
    Genre,
    Description,
    CoverImage,
}

impl BookFormField {
    pub(crate) const ALL: [BookFormField; 7] = [
        BookFormField::Title,
        BookFormField::Author,
        BookFormField::Isbn,
        BookFormField::PublishedYear,
        BookFormField::Genre,
        BookFormField::Description,
        BookFormField::CoverImage,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookFormField::Title => "Title",
            BookFormField::Author => "Author",
            BookFormField::Isbn => "ISBN",
            BookFormField::PublishedYear => "Year",
            BookFormField::Genre => "Genre",
            BookFormField::Description => "Description",
            BookFormField::CoverImage => "Cover URL",
        }
    }

    /// Validation key reported for this field; the cover URL has none.
    pub(crate) fn validation_field(self) -> Option<BookField> {
        match self {
            BookFormField::Title => Some(BookField::Title),
            BookFormField::Author => Some(BookField::Author),
            BookFormField::Isbn => Some(BookField::Isbn),
            BookFormField::PublishedYear => Some(BookField::PublishedYear),
            BookFormField::Genre => Some(BookField::Genre),
            BookFormField::Description => Some(BookField::Description),
            BookFormField::CoverImage => None,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|field| *field == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

/// Editable copy of a book while the add/edit dialog is open.
#[derive(Clone, Debug, Default)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) isbn: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) description: String,
    pub(crate) cover: String,
    pub(crate) active: BookFormField,
    pub(crate) errors: ValidationErrors,
    pub(crate) error: Option<String>,
}

impl BookForm {
    /// Blank form with the year pre-filled to the current year.
    pub(crate) fn new() -> Self {
        Self {
            year: Utc::now().year().to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn from_book(book: &BookRecord) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            year: book.published_year.to_string(),
            genre: book.genre.clone(),
            description: book.description.clone(),
            cover: book.cover_image.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.offset(1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.offset(-1);
    }

    /// Append a character to the active field. The year only takes up to
    /// four digits.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        if self.active == BookFormField::PublishedYear
            && (!ch.is_ascii_digit() || self.year.len() >= MAX_YEAR_DIGITS)
        {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Shape submitted to the catalog. An empty year becomes "missing" and a
    /// blank cover becomes "none".
    pub(crate) fn to_form_data(&self) -> BookFormData {
        let cover = self.cover.trim();
        BookFormData {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            published_year: self.year.trim().parse().ok(),
            genre: self.genre.clone(),
            description: self.description.clone(),
            cover_image: (!cover.is_empty()).then(|| cover.to_string()),
        }
    }

    pub(crate) fn value(&self, field: BookFormField) -> &str {
        match field {
            BookFormField::Title => &self.title,
            BookFormField::Author => &self.author,
            BookFormField::Isbn => &self.isbn,
            BookFormField::PublishedYear => &self.year,
            BookFormField::Genre => &self.genre,
            BookFormField::Description => &self.description,
            BookFormField::CoverImage => &self.cover,
        }
    }

    fn value_mut(&mut self, field: BookFormField) -> &mut String {
        match field {
            BookFormField::Title => &mut self.title,
            BookFormField::Author => &mut self.author,
            BookFormField::Isbn => &mut self.isbn,
            BookFormField::PublishedYear => &mut self.year,
            BookFormField::Genre => &mut self.genre,
            BookFormField::Description => &mut self.description,
            BookFormField::CoverImage => &mut self.cover,
        }
    }

    /// Validation message attached to `field`, if the last submit failed it.
    pub(crate) fn field_error(&self, field: BookFormField) -> Option<&str> {
        field
            .validation_field()
            .and_then(|key| self.errors.get(key))
    }

    /// Render one field, with its validation message trailing in red.
    pub(crate) fn build_line(&self, field: BookFormField, accent: Color) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            if field == BookFormField::CoverImage {
                "<optional>".to_string()
            } else {
                "<required>".to_string()
            }
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(accent)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::raw(format!("{:>12}: ", field.label())),
            Span::styled(display, style),
        ];
        if let Some(message) = self.field_error(field) {
            spans.push(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            ));
        }
        Line::from(spans)
    }

    /// Width of the label column, used to place the cursor.
    pub(crate) fn label_width() -> u16 {
        "            : ".len() as u16
    }
}

/// Fields of the sign-in dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum LoginField {
    #[default]
    Username,
    Password,
}

/// Sign-in dialog state. `then_add` re-opens the add form once the user is
/// in, matching the "publish a book" entry point.
#[derive(Clone, Debug, Default)]
pub(crate) struct LoginForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) active: LoginField,
    pub(crate) error: Option<String>,
    pub(crate) then_add: bool,
}

impl LoginForm {
    pub(crate) fn new(then_add: bool) -> Self {
        Self {
            then_add,
            ..Self::default()
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            LoginField::Username => self.username.push(ch),
            LoginField::Password => self.password.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    /// Render a field; the password is masked.
    pub(crate) fn build_line(&self, field: LoginField, accent: Color) -> Line<'static> {
        let (name, display) = match field {
            LoginField::Username => ("Username", self.username.clone()),
            LoginField::Password => ("Password", "*".repeat(self.password.chars().count())),
        };
        let style = if self.active == field {
            Style::default().fg(accent)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("{name}: ")),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self, field: LoginField) -> usize {
        match field {
            LoginField::Username => self.username.chars().count(),
            LoginField::Password => self.password.chars().count(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: String,
    pub(crate) title: String,
}

impl ConfirmBookDelete {
    pub(crate) fn from(book: &BookRecord) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
        }
    }
}
