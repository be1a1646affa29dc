pub mod autofill;
pub mod books;
pub mod library;
pub mod logging;
