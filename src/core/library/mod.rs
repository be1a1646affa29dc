//! Reading library: the shelf of books, their categories and the per-day
//! reading log, persisted as a single JSON document.

pub mod filter;
pub mod model;
pub mod store;

pub use filter::{BookFilter, BookOrder, StatusFilter};
pub use model::{Book, Category, NewBook, Rating, ReadingEntry};
pub use store::{Library, LibraryError, LibraryResult};
