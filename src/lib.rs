/// Pagetrail - terminal reading tracker
///
/// Core library providing the book-search autofill controller, the
/// Google Books lookup client, the reading library, and the TUI.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
