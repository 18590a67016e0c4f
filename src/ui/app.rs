use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::auth::AuthService;
use crate::catalog::{can_edit, CatalogStore, RECENT_LIMIT};
use crate::db::BlobStore;
use crate::error::CatalogError;
use crate::models::{BookPatch, BookRecord};

use super::forms::{BookForm, BookFormField, ConfirmBookDelete, LoginField, LoginForm};
use super::helpers::{centered_rect, cover_swatch, field_line, surface_error, truncate};
use super::screens::CatalogScreen;
use super::theme::Theme;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header space for the app title, signed-in user and active filters.
const HEADER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Catalog,
    Dashboard,
}

/// Modal state layered over the current screen.
pub(crate) enum Mode {
    Normal,
    Searching(String),
    LoggingIn(LoginForm),
    AddingBook(BookForm),
    EditingBook { id: String, form: BookForm },
    ConfirmDelete(ConfirmBookDelete),
    ViewingBook(BookRecord),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the catalog, the sign-in state and the view
/// over them.
pub struct App<B: BlobStore + Clone> {
    catalog: CatalogStore<B>,
    auth: AuthService<B>,
    settings: B,
    theme: Theme,
    view: CatalogScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<B: BlobStore + Clone> App<B> {
    /// Hydrate the catalog and sign-in state from `store`.
    pub fn new(store: B) -> Result<Self> {
        let catalog = CatalogStore::initialize(store.clone())?;
        let auth = AuthService::load(store.clone())?;
        let theme = Theme::load(&store);
        let view = CatalogScreen::new(catalog.books(), catalog.genres());

        Ok(Self {
            catalog,
            auth,
            settings: store,
            theme,
            view,
            screen: Screen::Catalog,
            mode: Mode::Normal,
            status: None,
        })
    }

    pub fn catalog(&self) -> &CatalogStore<B> {
        &self.catalog
    }

    pub fn auth(&self) -> &AuthService<B> {
        &self.auth
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Records currently visible in the catalog list.
    pub fn visible_books(&self) -> &[BookRecord] {
        &self.view.visible
    }

    pub fn selected_book(&self) -> Option<&BookRecord> {
        self.view.current_book()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub(crate) fn screen(&self) -> Screen {
        self.screen
    }

    pub(crate) fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(text) => self.handle_search(code, text),
            Mode::LoggingIn(form) => self.handle_login(code, form),
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::EditingBook { id, form } => self.handle_edit_book(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::ViewingBook(book) => self.handle_view_book(code, book),
        };

        Ok(exit)
    }

    /// Ctrl+L drops the search text and genre filter from anywhere.
    pub(crate) fn handle_ctrl_l(&mut self) {
        self.view.clear_filters(self.catalog.books());
        if matches!(self.mode, Mode::Searching(_)) {
            self.mode = Mode::Searching(String::new());
        }
        self.set_status("Filters cleared.", StatusKind::Info);
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.toggle_theme();
                return Ok(Mode::Normal);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => return Ok(self.toggle_login()),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Tab => {
                self.clear_status();
                self.screen = match self.screen {
                    Screen::Catalog => Screen::Dashboard,
                    Screen::Dashboard => Screen::Catalog,
                };
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        if self.screen == Screen::Dashboard {
            if code == KeyCode::Esc {
                self.screen = Screen::Catalog;
            }
            return Ok(Mode::Normal);
        }

        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Up => self.view.move_selection(-1),
            KeyCode::Down => self.view.move_selection(1),
            KeyCode::PageUp => self.view.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.view.move_selection(PAGE_STEP),
            KeyCode::Home => self.view.select_first(),
            KeyCode::End => self.view.select_last(),
            KeyCode::Char('/') | KeyCode::Char('f') | KeyCode::Char('F') => {
                self.clear_status();
                return Ok(Mode::Searching(self.view.query.text.clone()));
            }
            KeyCode::Char('g') => self.view.cycle_genre(self.catalog.books(), 1),
            KeyCode::Char('G') => self.view.cycle_genre(self.catalog.books(), -1),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.view.clear_filters(self.catalog.books());
                self.set_status("Filters cleared.", StatusKind::Info);
            }
            KeyCode::Enter => {
                if let Some(book) = self.view.current_book().cloned() {
                    self.clear_status();
                    return Ok(Mode::ViewingBook(book));
                }
                self.set_status("No book selected.", StatusKind::Error);
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                if let Some(book) = self.view.current_book().cloned() {
                    self.open_cover(&book);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                if self.auth.is_logged_in() {
                    return Ok(Mode::AddingBook(BookForm::new()));
                }
                return Ok(Mode::LoggingIn(LoginForm::new(true)));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(book) = self.editable_selection("edit") {
                    self.clear_status();
                    return Ok(Mode::EditingBook {
                        id: book.id.clone(),
                        form: BookForm::from_book(&book),
                    });
                }
            }
            KeyCode::Char('-') | KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(book) = self.editable_selection("delete") {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmBookDelete::from(&book)));
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut text: String) -> Mode {
        match code {
            KeyCode::Esc => {
                self.view.set_search(self.catalog.books(), String::new());
                return Mode::Normal;
            }
            KeyCode::Enter => {
                let count = self.view.visible.len();
                self.set_status(
                    format!("{count} of {} books match.", self.view.total),
                    StatusKind::Info,
                );
                return Mode::Normal;
            }
            KeyCode::Up => self.view.move_selection(-1),
            KeyCode::Down => self.view.move_selection(1),
            KeyCode::Backspace => {
                text.pop();
                self.view.set_search(self.catalog.books(), text.clone());
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                text.push(ch);
                self.view.set_search(self.catalog.books(), text.clone());
            }
            _ => {}
        }
        Mode::Searching(text)
    }

    fn handle_login(&mut self, code: KeyCode, mut form: LoginForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Login cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                form.toggle_field();
                Mode::LoggingIn(form)
            }
            KeyCode::Backspace => {
                form.backspace();
                Mode::LoggingIn(form)
            }
            KeyCode::Enter => {
                if form.active == LoginField::Username && form.password.is_empty() {
                    form.toggle_field();
                    return Mode::LoggingIn(form);
                }
                match self.auth.login(&form.username, &form.password) {
                    Ok(identity) => {
                        self.set_status(
                            format!("Signed in as {}.", identity.name),
                            StatusKind::Info,
                        );
                        if form.then_add {
                            Mode::AddingBook(BookForm::new())
                        } else {
                            Mode::Normal
                        }
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                        Mode::LoggingIn(form)
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Mode::LoggingIn(form)
            }
            _ => Mode::LoggingIn(form),
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        if !Self::edit_form_key(code, &mut form) {
            return Mode::AddingBook(form);
        }
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter => {
                let author = self.auth.username().to_string();
                match self.catalog.add(form.to_form_data(), &author) {
                    Ok(book) => {
                        self.refresh_view(Some(&book.id));
                        self.set_status(format!("Added \"{}\".", book.title), StatusKind::Info);
                        Mode::Normal
                    }
                    Err(err) => {
                        self.report_form_error(&mut form, err);
                        Mode::AddingBook(form)
                    }
                }
            }
            _ => Mode::AddingBook(form),
        }
    }

    fn handle_edit_book(&mut self, code: KeyCode, id: String, mut form: BookForm) -> Mode {
        if !Self::edit_form_key(code, &mut form) {
            return Mode::EditingBook { id, form };
        }
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter => {
                let requester = self.auth.username().to_string();
                let patch = BookPatch::from(form.to_form_data());
                match self.catalog.update(&id, patch, &requester) {
                    Ok(book) => {
                        self.refresh_view(Some(&book.id));
                        self.set_status(
                            format!("Updated \"{}\".", book.title),
                            StatusKind::Info,
                        );
                        Mode::Normal
                    }
                    Err(err) if err.is_refusal() => {
                        self.refresh_view(None);
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Mode::Normal
                    }
                    Err(err) => {
                        self.report_form_error(&mut form, err);
                        Mode::EditingBook { id, form }
                    }
                }
            }
            _ => Mode::EditingBook { id, form },
        }
    }

    /// Shared typing/navigation keys for the book form. Returns `true` when
    /// the key still needs handling by the caller (submit or cancel).
    fn edit_form_key(code: KeyCode, form: &mut BookForm) -> bool {
        match code {
            KeyCode::Esc | KeyCode::Enter => return true,
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let requester = self.auth.username().to_string();
                match self.catalog.delete(&confirm.id, &requester) {
                    Ok(()) => {
                        self.refresh_view(None);
                        self.set_status(
                            format!("Deleted \"{}\".", confirm.title),
                            StatusKind::Info,
                        );
                        Mode::Normal
                    }
                    Err(err) if err.is_refusal() => {
                        self.refresh_view(None);
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Mode::Normal
                    }
                    Err(err) => {
                        self.set_status(
                            format!("Not deleted: {}", surface_error(&err)),
                            StatusKind::Error,
                        );
                        Mode::ConfirmDelete(confirm)
                    }
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_view_book(&mut self, code: KeyCode, book: BookRecord) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Mode::Normal,
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.open_cover(&book);
                Mode::ViewingBook(book)
            }
            _ => Mode::ViewingBook(book),
        }
    }

    fn toggle_login(&mut self) -> Mode {
        if !self.auth.is_logged_in() {
            self.clear_status();
            return Mode::LoggingIn(LoginForm::new(false));
        }
        match self.auth.logout() {
            Ok(()) => self.set_status("Signed out.", StatusKind::Info),
            Err(err) => self.set_status(
                format!("Sign-out failed: {}", surface_error(&err)),
                StatusKind::Error,
            ),
        }
        Mode::Normal
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        match self.theme.save(&self.settings) {
            Ok(()) => self.set_status(
                format!("Switched to {} theme.", self.theme.as_str()),
                StatusKind::Info,
            ),
            Err(err) => self.set_status(
                format!("Theme not saved: {}", surface_error(&err)),
                StatusKind::Error,
            ),
        }
    }

    fn open_cover(&mut self, book: &BookRecord) {
        let url = book.cover_url();
        match open_link(&url) {
            Ok(()) => self.set_status(format!("Opened cover for {}.", book.title), StatusKind::Info),
            Err(err) => self.set_status(format!("Failed to open cover: {err}"), StatusKind::Error),
        }
    }

    /// The selected record, provided the signed-in user may change it.
    fn editable_selection(&mut self, action: &str) -> Option<BookRecord> {
        let Some(book) = self.view.current_book().cloned() else {
            self.set_status(format!("No book selected to {action}."), StatusKind::Error);
            return None;
        };
        if !self.auth.is_logged_in() {
            self.set_status(format!("Sign in to {action} books."), StatusKind::Error);
            return None;
        }
        if !can_edit(&book, self.auth.current_identity()) {
            self.set_status(
                format!("Only the creator of \"{}\" can {action} it.", book.title),
                StatusKind::Error,
            );
            return None;
        }
        Some(book)
    }

    fn report_form_error(&mut self, form: &mut BookForm, err: CatalogError) {
        match err {
            CatalogError::Validation(errors) => {
                form.errors = errors;
                form.error = Some("Please fix the highlighted fields.".to_string());
                if let Some(first) = BookFormField::ALL
                    .into_iter()
                    .find(|field| form.field_error(*field).is_some())
                {
                    form.active = first;
                }
                self.set_status("Please fix the highlighted fields.", StatusKind::Error);
            }
            other => {
                let message = surface_error(&other);
                form.error = Some(message.clone());
                self.set_status(format!("Not saved: {message}"), StatusKind::Error);
            }
        }
    }

    fn refresh_view(&mut self, focus_id: Option<&str>) {
        self.view
            .refresh(self.catalog.books(), self.catalog.genres(), focus_id);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT.min(area.height)),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        match self.screen {
            Screen::Catalog => self.draw_catalog(frame, chunks[1]),
            Screen::Dashboard => self.draw_dashboard(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Searching(text) => self.draw_search_bar(frame, chunks[0], text),
            Mode::LoggingIn(form) => self.draw_login(frame, area, form),
            Mode::AddingBook(form) => self.draw_book_form(frame, area, "Add Book", form),
            Mode::EditingBook { form, .. } => self.draw_book_form(frame, area, "Edit Book", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::ViewingBook(book) => self.draw_book_detail(frame, area, book),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let accent = Style::default()
            .fg(self.theme.accent())
            .add_modifier(Modifier::BOLD);
        let user = match self.auth.current_identity() {
            Some(identity) => format!("{} ({})", identity.name, identity.role),
            None => "visitor".to_string(),
        };
        let title = Line::from(vec![
            Span::styled("Library Catalog", accent),
            Span::raw(format!("   signed in: {user}")),
        ]);
        let filters = Line::from(Span::styled(
            format!(
                "Search: \"{}\"   Genre: {}   Showing {} of {} books",
                self.view.query.text,
                self.view.query.genre,
                self.view.visible.len(),
                self.view.total
            ),
            Style::default().fg(self.theme.muted()),
        ));
        let block = Block::default().borders(Borders::BOTTOM);
        let paragraph = Paragraph::new(vec![title, filters]).block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_catalog(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let identity = self.auth.current_identity();
        let width = columns[0].width.saturating_sub(6) as usize;
        let items: Vec<ListItem> = self
            .view
            .visible
            .iter()
            .map(|book| {
                let marker = if can_edit(book, identity) { "*" } else { " " };
                ListItem::new(Line::from(vec![
                    Span::styled("▌", Style::default().fg(cover_swatch(book))),
                    Span::raw(format!(
                        "{marker} {}",
                        truncate(&book.to_string(), width.saturating_sub(2))
                    )),
                ]))
            })
            .collect();

        let title = if self.view.visible.is_empty() {
            "Books (no matches)".to_string()
        } else {
            format!("Books ({})", self.view.visible.len())
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            );
        let mut state = ListState::default();
        if !self.view.visible.is_empty() {
            state.select(Some(self.view.selected));
        }
        frame.render_stateful_widget(list, columns[0], &mut state);

        let block = Block::default().borders(Borders::ALL).title("Details");
        let lines = match self.view.current_book() {
            Some(book) => self.detail_lines(book),
            None => vec![Line::from(Span::styled(
                "No books match the current search.",
                Style::default().fg(self.theme.muted()),
            ))],
        };
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, columns[1]);
    }

    fn detail_lines(&self, book: &BookRecord) -> Vec<Line<'static>> {
        let owner = book
            .created_by
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let mut lines = vec![
            Line::from(Span::styled(
                book.title.clone(),
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            field_line("Author", book.author.clone()),
            field_line("ISBN", book.isbn.clone()),
            field_line("Published", book.published_year.to_string()),
            field_line("Genre", book.genre.clone()),
            field_line("Added", book.added_date.format("%Y-%m-%d").to_string()),
            field_line("Added by", owner),
            field_line("Cover", book.cover_url()),
            Line::from(""),
            Line::from(book.description.clone()),
        ];
        if can_edit(book, self.auth.current_identity()) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "You added this book: [e] edit  [-] delete",
                Style::default().fg(self.theme.muted()),
            )));
        }
        lines
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let totals = Line::from(vec![
            Span::styled("Books: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{}   ", self.catalog.len())),
            Span::styled("Authors: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{}   ", self.catalog.distinct_author_count())),
            Span::styled("Genres: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(self.catalog.genres().len().to_string()),
        ]);
        frame.render_widget(
            Paragraph::new(totals).block(Block::default().borders(Borders::ALL).title("Overview")),
            rows[0],
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(rows[1]);

        let genre_items: Vec<ListItem> = self
            .catalog
            .genre_counts()
            .into_iter()
            .map(|entry| ListItem::new(format!("{:>3}  {}", entry.count, entry.genre)))
            .collect();
        frame.render_widget(
            List::new(genre_items)
                .block(Block::default().borders(Borders::ALL).title("Books by genre")),
            columns[0],
        );

        let recent_items: Vec<ListItem> = self
            .catalog
            .recent(RECENT_LIMIT)
            .into_iter()
            .map(|book| {
                ListItem::new(format!(
                    "{}  {}",
                    book.added_date.format("%Y-%m-%d"),
                    book
                ))
            })
            .collect();
        frame.render_widget(
            List::new(recent_items)
                .block(Block::default().borders(Borders::ALL).title("Recently added")),
            columns[1],
        );

        let featured_items: Vec<ListItem> = self
            .catalog
            .featured()
            .into_iter()
            .map(|book| {
                ListItem::new(Line::from(vec![
                    Span::styled("▌ ", Style::default().fg(cover_swatch(&book))),
                    Span::raw(book.title),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(featured_items)
                .block(Block::default().borders(Borders::ALL).title("Featured")),
            columns[2],
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(self.theme.accent())
            .add_modifier(Modifier::BOLD);
        let hint = |key: &'static str, label: &'static str| {
            vec![
                Span::styled(key, key_style),
                Span::raw(format!(" {label}   ")),
            ]
        };

        let groups: Vec<Vec<Span<'static>>> = match (&self.screen, &self.mode) {
            (_, Mode::Searching(_)) => vec![
                hint("[type]", "Filter"),
                hint("[Enter]", "Keep"),
                hint("[Esc]", "Clear"),
            ],
            (_, Mode::LoggingIn(_)) => vec![
                hint("[Tab]", "Switch field"),
                hint("[Enter]", "Sign in"),
                hint("[Esc]", "Cancel"),
            ],
            (_, Mode::AddingBook(_)) | (_, Mode::EditingBook { .. }) => vec![
                hint("[Tab/↑↓]", "Field"),
                hint("[Enter]", "Save"),
                hint("[Esc]", "Cancel"),
            ],
            (_, Mode::ConfirmDelete(_)) => vec![hint("[Y]", "Delete"), hint("[N/Esc]", "Keep")],
            (_, Mode::ViewingBook(_)) => vec![hint("[o]", "Open cover"), hint("[Esc]", "Close")],
            (Screen::Dashboard, _) => vec![
                hint("[d/Esc]", "Catalog"),
                hint("[t]", "Theme"),
                hint("[l]", if self.auth.is_logged_in() { "Sign out" } else { "Sign in" }),
                hint("[q]", "Quit"),
            ],
            (Screen::Catalog, _) => vec![
                hint("[↑↓]", "Navigate"),
                hint("[/]", "Search"),
                hint("[g/G]", "Genre"),
                hint("[Enter]", "Details"),
                hint("[+]", "Add"),
                hint("[e]", "Edit"),
                hint("[-]", "Delete"),
                hint("[d]", "Dashboard"),
                hint("[l]", if self.auth.is_logged_in() { "Sign out" } else { "Sign in" }),
                hint("[t]", "Theme"),
                hint("[q]", "Quit"),
            ],
        };

        Line::from(groups.into_iter().flatten().collect::<Vec<_>>())
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, text: &str) {
        frame.render_widget(Clear, area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {text}")))
            .block(block.clone())
            .style(self.theme.base());
        frame.render_widget(paragraph, area);

        let inner = block.inner(area);
        let cursor_x = inner.x + "Search: ".len() as u16 + text.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect, form: &LoginForm) {
        let popup_area = centered_rect(50, 35, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Sign In")
            .borders(Borders::ALL)
            .style(self.theme.base());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(LoginField::Username, self.theme.accent()),
            form.build_line(LoginField::Password, self.theme.accent()),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Any non-empty username and password will do.",
                Style::default().fg(self.theme.muted()),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let (prefix, row) = match form.active {
            LoginField::Username => ("Username: ".len() as u16, 0),
            LoginField::Password => ("Password: ".len() as u16, 1),
        };
        frame.set_cursor_position((
            inner.x + prefix + form.value_len(form.active) as u16,
            inner.y + row,
        ));
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(80, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .style(self.theme.base());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookFormField::ALL
            .into_iter()
            .map(|field| form.build_line(field, self.theme.accent()))
            .collect();
        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(self.theme.muted()),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        let row = BookFormField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let cursor_x =
            inner.x + BookForm::label_width() + form.value(form.active).chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y + row));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL)
            .style(self.theme.base());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Are you sure you want to delete \"{}\"?", confirm.title)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(self.theme.muted()),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_book_detail(&self, frame: &mut Frame, area: Rect, book: &BookRecord) {
        let popup_area = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(book.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(cover_swatch(book)))
            .style(self.theme.base());
        let paragraph = Paragraph::new(self.detail_lines(book))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}
