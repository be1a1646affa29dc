//! Cross-module unit tests
//!
//! - `google_books_tests`: HTTP adapter against a wiremock server
//! - `autofill_flow_tests`: search, select and save into the library

mod autofill_flow_tests;
mod google_books_tests;
