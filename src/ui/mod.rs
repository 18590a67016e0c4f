//! Ratatui front end. The catalog core owns every rule; this layer turns key
//! presses into catalog calls and renders the result.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;
mod theme;

#[cfg(test)]
mod tests;

pub use app::App;
pub use terminal::run_app;
pub use theme::Theme;
