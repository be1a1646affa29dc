//! JSON-backed library store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::filter::{BookFilter, BookOrder};
use super::model::{Book, Category, NewBook, Rating, ReadingEntry};

pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt library file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    #[error("Pages read must be at least 1")]
    InvalidPages,

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Category name must not be empty")]
    InvalidCategoryName,

    #[error("Category {0:?} already exists")]
    DuplicateCategory(String),

    #[error("Category {name:?} still holds {books} book(s)")]
    CategoryInUse { name: String, books: usize },
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(skip)]
    path: Option<PathBuf>,
    #[serde(default)]
    books: Vec<Book>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    entries: Vec<ReadingEntry>,
}

impl Library {
    /// A library that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file yields an empty library that will be
    /// created on the first save.
    pub fn load(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let path = path.as_ref();
        let mut library = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str::<Library>(&contents)?
        } else {
            log::info!("No library at {}; starting empty", path.display());
            Library::default()
        };
        library.path = Some(path.to_path_buf());
        library.sort_categories();
        log::debug!(
            "Loaded {} books, {} categories and {} reading entries",
            library.books.len(),
            library.categories.len(),
            library.entries.len()
        );
        Ok(library)
    }

    pub fn save(&self) -> LibraryResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, id: Uuid) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Finished books, most recently finished first.
    pub fn completed(&self) -> Vec<&Book> {
        let mut done: Vec<&Book> = self.books.iter().filter(|b| b.is_completed()).collect();
        done.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        done
    }

    /// Books matching `filter`, sorted by `order`.
    pub fn filter(&self, filter: &BookFilter, order: BookOrder) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.iter().filter(|b| filter.matches(b)).collect();
        books.sort_by(|a, b| order.compare(a, b));
        books
    }

    /// Add a book unless an equivalent one is already shelved. Returns the
    /// id of the stored book and whether it was newly created.
    ///
    /// The category name resolves to an existing category ignoring case, or
    /// creates one. A blank name leaves the book uncategorized.
    pub fn add_book(&mut self, new: NewBook) -> (Uuid, bool) {
        if let Some(existing) = self.books.iter().find(|b| b.matches(&new)) {
            log::info!("Book {:?} already in library", existing.title);
            return (existing.id, false);
        }
        let category = self.resolve_category(&new.category);
        let book = Book::from_new(new, category);
        let id = book.id;
        log::info!("Added book {:?} ({id})", book.title);
        self.books.push(book);
        (id, true)
    }

    pub fn set_rating(&mut self, id: Uuid, rating: Rating) -> LibraryResult<&Book> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(LibraryError::BookNotFound(id))?;
        if book.rating != rating {
            book.rating = rating;
            book.updated_at = Utc::now();
        }
        Ok(book)
    }

    /// Categories sorted by name, ignoring case.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn books_in_category(&self, id: Uuid) -> usize {
        self.books.iter().filter(|b| b.category == Some(id)).count()
    }

    pub fn add_category(&mut self, name: &str) -> LibraryResult<Uuid> {
        let name = self.check_category_name(name, None)?;
        let id = Uuid::new_v4();
        log::info!("Added category {name:?} ({id})");
        self.categories.push(Category { id, name });
        self.sort_categories();
        Ok(id)
    }

    pub fn rename_category(&mut self, id: Uuid, name: &str) -> LibraryResult<&Category> {
        let name = self.check_category_name(name, Some(id))?;
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(LibraryError::CategoryNotFound(id))?;
        log::info!("Renamed category {:?} to {name:?}", self.categories[index].name);
        self.categories[index].name = name;
        self.sort_categories();
        self.category(id).ok_or(LibraryError::CategoryNotFound(id))
    }

    /// Remove an empty category. Refused while any book belongs to it.
    pub fn remove_category(&mut self, id: Uuid) -> LibraryResult<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(LibraryError::CategoryNotFound(id))?;
        let books = self.books_in_category(id);
        if books > 0 {
            return Err(LibraryError::CategoryInUse {
                name: self.categories[index].name.clone(),
                books,
            });
        }
        Ok(self.categories.remove(index))
    }

    fn check_category_name(&self, name: &str, renaming: Option<Uuid>) -> LibraryResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::InvalidCategoryName);
        }
        match self.category_by_name(name) {
            Some(existing) if Some(existing.id) != renaming => {
                Err(LibraryError::DuplicateCategory(existing.name.clone()))
            }
            _ => Ok(name.to_string()),
        }
    }

    fn resolve_category(&mut self, name: &str) -> Option<Uuid> {
        if name.trim().is_empty() {
            return None;
        }
        if let Some(existing) = self.category_by_name(name) {
            return Some(existing.id);
        }
        self.add_category(name).ok()
    }

    fn sort_categories(&mut self) {
        self.categories
            .sort_by_key(|c| c.name.to_lowercase());
    }

    /// Remove a book and its reading log.
    pub fn remove_book(&mut self, id: Uuid) -> LibraryResult<Book> {
        let index = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(LibraryError::BookNotFound(id))?;
        self.entries.retain(|e| e.book_id != id);
        Ok(self.books.remove(index))
    }

    /// Reading log for one book, newest day first.
    pub fn entries_for(&self, book_id: Uuid) -> Vec<&ReadingEntry> {
        let mut entries: Vec<&ReadingEntry> =
            self.entries.iter().filter(|e| e.book_id == book_id).collect();
        entries.sort_by(|a, b| b.day.cmp(&a.day));
        entries
    }

    /// Record `pages` read on `day`, replacing any earlier entry for that
    /// book and day, then recompute the book's progress.
    pub fn log_reading(&mut self, book_id: Uuid, day: NaiveDate, pages: u32) -> LibraryResult<&Book> {
        if pages == 0 {
            return Err(LibraryError::InvalidPages);
        }
        if self.book(book_id).is_none() {
            return Err(LibraryError::BookNotFound(book_id));
        }

        match self
            .entries
            .iter_mut()
            .find(|e| e.book_id == book_id && e.day == day)
        {
            Some(entry) => entry.pages = pages,
            None => self.entries.push(ReadingEntry { book_id, day, pages }),
        }
        self.recompute(book_id)
    }

    /// Drop the entry for `book_id` on `day`. Returns whether one existed.
    pub fn remove_reading(&mut self, book_id: Uuid, day: NaiveDate) -> LibraryResult<bool> {
        if self.book(book_id).is_none() {
            return Err(LibraryError::BookNotFound(book_id));
        }
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.book_id == book_id && e.day == day));
        let removed = self.entries.len() != before;
        self.recompute(book_id)?;
        Ok(removed)
    }

    /// Pages read per day across all books for `from..=to`, one element per
    /// day in date order, zero where nothing was logged.
    pub fn daily_totals(&self, from: NaiveDate, to: NaiveDate) -> Vec<(NaiveDate, u32)> {
        let mut totals: BTreeMap<NaiveDate, u32> = from
            .iter_days()
            .take_while(|d| *d <= to)
            .map(|d| (d, 0))
            .collect();
        for entry in &self.entries {
            if let Some(total) = totals.get_mut(&entry.day) {
                *total = total.saturating_add(entry.pages);
            }
        }
        totals.into_iter().collect()
    }

    fn recompute(&mut self, book_id: Uuid) -> LibraryResult<&Book> {
        let sum: u32 = self
            .entries
            .iter()
            .filter(|e| e.book_id == book_id)
            .fold(0u32, |acc, e| acc.saturating_add(e.pages));

        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == book_id)
            .ok_or(LibraryError::BookNotFound(book_id))?;

        book.pages_read = sum.min(book.total_pages);
        book.updated_at = Utc::now();
        if book.pages_read >= book.total_pages {
            if book.completed_at.is_none() {
                log::info!("Finished {:?}", book.title);
                book.completed_at = Some(Utc::now());
            }
        } else {
            book.completed_at = None;
        }
        Ok(book)
    }
}
