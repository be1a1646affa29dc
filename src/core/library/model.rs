//! Library records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validated add-book submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub total_pages: u32,
    /// Category name. Resolved against the library's categories on add;
    /// blank leaves the book uncategorized.
    pub category: String,
    pub rating: Rating,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub total_pages: u32,
    /// Pages read so far, derived from the reading log and capped at the total.
    #[serde(default)]
    pub pages_read: u32,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    pub added_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Build a stored record. `category` is the already-resolved id.
    pub fn from_new(new: NewBook, category: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            author: new.author,
            total_pages: new.total_pages,
            pages_read: 0,
            category,
            rating: new.rating,
            isbn: new.isbn,
            cover_url: new.cover_url,
            external_id: new.external_id,
            added_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Progress in percent, capped at 100. Zero for a zero page total.
    pub fn progress_pct(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (f64::from(self.pages_read) / f64::from(self.total_pages) * 100.0).min(100.0)
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Whether `new` describes the same book.
    ///
    /// The strongest identifier both sides carry decides: volume id, then
    /// ISBN, then title, author and page total together.
    pub fn matches(&self, new: &NewBook) -> bool {
        if let (Some(a), Some(b)) = (&self.external_id, &new.external_id) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.isbn, &new.isbn) {
            return a == b;
        }
        self.title.eq_ignore_ascii_case(&new.title)
            && self.author.eq_ignore_ascii_case(&new.author)
            && self.total_pages == new.total_pages
    }
}

/// A named shelf grouping. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// Five-step book rating, stored as its number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    Terrible = 1,
    Poor = 2,
    #[default]
    Fair = 3,
    Good = 4,
    Great = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Rating must be between 1 and 5, got {0}")]
pub struct InvalidRating(pub u8);

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::Terrible,
        Rating::Poor,
        Rating::Fair,
        Rating::Good,
        Rating::Great,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Terrible => "Terrible",
            Rating::Poor => "Poor",
            Rating::Fair => "Fair",
            Rating::Good => "Good",
            Rating::Great => "Great",
        }
    }

    /// Filled and empty stars, e.g. `★★★☆☆`.
    pub fn stars(self) -> String {
        let filled = usize::from(self.value());
        format!("{}{}", "\u{2605}".repeat(filled), "\u{2606}".repeat(5 - filled))
    }

    /// One step up, stopping at `Great`.
    pub fn raised(self) -> Self {
        Rating::try_from(self.value() + 1).unwrap_or(self)
    }

    /// One step down, stopping at `Terrible`.
    pub fn lowered(self) -> Self {
        Rating::try_from(self.value().saturating_sub(1)).unwrap_or(self)
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::ALL
            .into_iter()
            .find(|r| r.value() == value)
            .ok_or(InvalidRating(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

/// Pages read for one book on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingEntry {
    pub book_id: Uuid,
    pub day: NaiveDate,
    pub pages: u32,
}
