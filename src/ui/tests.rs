use crossterm::event::KeyCode;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use crate::db::MemoryBlobStore;

use super::app::{App, Mode, Screen};
use super::theme::Theme;

fn app() -> App<MemoryBlobStore> {
    App::new(MemoryBlobStore::new()).unwrap()
}

fn press(app: &mut App<MemoryBlobStore>, codes: &[KeyCode]) {
    for code in codes {
        assert!(!app.handle_key(*code).unwrap(), "unexpected exit on {code:?}");
    }
}

fn type_text(app: &mut App<MemoryBlobStore>, text: &str) {
    for ch in text.chars() {
        app.handle_key(KeyCode::Char(ch)).unwrap();
    }
}

fn sign_in(app: &mut App<MemoryBlobStore>, name: &str) {
    press(app, &[KeyCode::Char('l')]);
    type_text(app, name);
    press(app, &[KeyCode::Tab]);
    type_text(app, "secret");
    press(app, &[KeyCode::Enter]);
}

fn render(app: &App<MemoryBlobStore>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn starts_on_the_seeded_catalog() {
    let app = app();
    assert_eq!(app.visible_books().len(), 6);
    assert_eq!(app.screen(), Screen::Catalog);
    assert!(render(&app).contains("The Great Gatsby"));
}

#[test]
fn typing_a_search_filters_live() {
    let mut app = app();
    press(&mut app, &[KeyCode::Char('/')]);
    type_text(&mut app, "dune");
    assert_eq!(app.visible_books().len(), 1);
    assert_eq!(app.selected_book().unwrap().title, "Dune");

    press(&mut app, &[KeyCode::Enter]);
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_text(), Some("1 of 6 books match."));

    press(&mut app, &[KeyCode::Char('/'), KeyCode::Esc]);
    assert_eq!(app.visible_books().len(), 6);
}

#[test]
fn genre_key_cycles_the_filter() {
    let mut app = app();
    press(&mut app, &[KeyCode::Char('g')]);
    let titles: Vec<_> = app
        .visible_books()
        .iter()
        .map(|book| book.title.as_str())
        .collect();
    assert_eq!(titles, ["The Great Gatsby", "To Kill a Mockingbird"]);

    press(&mut app, &[KeyCode::Char('c')]);
    assert_eq!(app.visible_books().len(), 6);
}

#[test]
fn adding_requires_sign_in_and_then_opens_the_form() {
    let mut app = app();
    press(&mut app, &[KeyCode::Char('+')]);
    assert!(matches!(app.mode(), Mode::LoggingIn(_)));

    type_text(&mut app, "ada");
    press(&mut app, &[KeyCode::Enter]);
    type_text(&mut app, "pw");
    press(&mut app, &[KeyCode::Enter]);
    assert_eq!(app.auth().username(), "ada");
    assert!(matches!(app.mode(), Mode::AddingBook(_)));
}

#[test]
fn blank_login_stays_open_with_an_error() {
    let mut app = app();
    press(&mut app, &[KeyCode::Char('l')]);
    type_text(&mut app, "ada");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "   ");
    press(&mut app, &[KeyCode::Enter]);
    match app.mode() {
        Mode::LoggingIn(form) => assert_eq!(
            form.error.as_deref(),
            Some("Please enter both username and password")
        ),
        _ => panic!("login dialog should stay open"),
    }
    assert!(!app.auth().is_logged_in());
}

#[test]
fn submitting_an_invalid_book_keeps_the_form_with_field_errors() {
    let mut app = app();
    sign_in(&mut app, "ada");
    press(&mut app, &[KeyCode::Char('+')]);
    type_text(&mut app, "Neuromancer");
    press(&mut app, &[KeyCode::Enter]);

    match app.mode() {
        Mode::AddingBook(form) => {
            assert!(form.errors.len() >= 4);
            assert_eq!(form.active, super::forms::BookFormField::Author);
        }
        _ => panic!("form should stay open"),
    }
    assert_eq!(app.catalog().len(), 6);
}

#[test]
fn a_valid_book_is_added_and_focused() {
    let mut app = app();
    sign_in(&mut app, "ada");
    press(&mut app, &[KeyCode::Char('+')]);
    type_text(&mut app, "Neuromancer");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "William Gibson");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "9780441569595");
    press(&mut app, &[KeyCode::Tab]);
    for _ in 0..4 {
        press(&mut app, &[KeyCode::Backspace]);
    }
    type_text(&mut app, "1984");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "Cyberpunk");
    press(&mut app, &[KeyCode::Tab]);
    type_text(&mut app, "A washed-up hacker takes one last job.");
    press(&mut app, &[KeyCode::Enter]);

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.catalog().len(), 7);
    let selected = app.selected_book().unwrap();
    assert_eq!(selected.title, "Neuromancer");
    assert_eq!(selected.created_by.as_deref(), Some("ada"));
    assert_eq!(selected.published_year, 1984);
}

#[test]
fn seed_records_cannot_be_edited_by_other_users() {
    let mut app = app();
    sign_in(&mut app, "ada");
    press(&mut app, &[KeyCode::Char('e')]);
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(
        app.status_text(),
        Some("Only the creator of \"The Great Gatsby\" can edit it.")
    );

    press(&mut app, &[KeyCode::Char('-')]);
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.catalog().len(), 6);
}

#[test]
fn owner_can_edit_and_delete() {
    let mut app = app();
    sign_in(&mut app, "Admin");

    press(&mut app, &[KeyCode::Char('e')]);
    assert!(matches!(app.mode(), Mode::EditingBook { .. }));
    type_text(&mut app, " (Annotated)");
    press(&mut app, &[KeyCode::Tab, KeyCode::Tab]);
    for _ in 0.."978-0-7432-7356-5".len() {
        press(&mut app, &[KeyCode::Backspace]);
    }
    type_text(&mut app, "9780743273565");
    press(&mut app, &[KeyCode::Enter]);
    assert_eq!(
        app.selected_book().unwrap().title,
        "The Great Gatsby (Annotated)"
    );

    press(&mut app, &[KeyCode::Char('-')]);
    assert!(matches!(app.mode(), Mode::ConfirmDelete(_)));
    press(&mut app, &[KeyCode::Char('y')]);
    assert_eq!(app.catalog().len(), 5);
    assert!(app
        .visible_books()
        .iter()
        .all(|book| !book.title.starts_with("The Great Gatsby")));
}

#[test]
fn visitors_are_asked_to_sign_in_before_editing() {
    let mut app = app();
    press(&mut app, &[KeyCode::Char('e')]);
    assert_eq!(app.status_text(), Some("Sign in to edit books."));
}

#[test]
fn theme_toggle_is_remembered() {
    let store = MemoryBlobStore::new();
    let mut app = App::new(store.clone()).unwrap();
    press(&mut app, &[KeyCode::Char('t')]);
    assert_eq!(app.theme(), Theme::Dark);

    let reopened = App::new(store).unwrap();
    assert_eq!(reopened.theme(), Theme::Dark);
}

#[test]
fn dashboard_shows_aggregates() {
    let mut app = app();
    press(&mut app, &[KeyCode::Char('d')]);
    assert_eq!(app.screen(), Screen::Dashboard);
    let screen = render(&app);
    assert!(screen.contains("Books by genre"));
    assert!(screen.contains("Recently added"));
    assert!(screen.contains("Pride and Prejudice"));

    press(&mut app, &[KeyCode::Esc]);
    assert_eq!(app.screen(), Screen::Catalog);
}

#[test]
fn forms_and_dialogs_render() {
    let mut app = app();
    sign_in(&mut app, "ada");
    press(&mut app, &[KeyCode::Char('+'), KeyCode::Enter]);
    assert!(render(&app).contains("Title is required"));

    press(&mut app, &[KeyCode::Esc, KeyCode::Enter]);
    assert!(matches!(app.mode(), Mode::ViewingBook(_)));
    assert!(render(&app).contains("placehold.co"));
}

#[test]
fn ctrl_l_clears_filters() {
    let mut app = app();
    press(&mut app, &[KeyCode::Char('G')]);
    assert_eq!(app.visible_books()[0].genre, "Science Fiction");
    app.handle_ctrl_l();
    assert_eq!(app.visible_books().len(), 6);
}

#[test]
fn q_quits() {
    let mut app = app();
    assert!(app.handle_key(KeyCode::Char('q')).unwrap());
}
