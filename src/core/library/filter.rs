//! Shelf filtering and ordering.
//!
//! A [`BookFilter`] narrows the shelf by free text, category, author, page
//! range and reading status. A [`BookOrder`] sorts what remains.

use std::cmp::Ordering;

use uuid::Uuid;

use super::model::Book;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Reading,
    Completed,
}

impl StatusFilter {
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Reading,
            StatusFilter::Reading => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Reading => "Reading",
            StatusFilter::Completed => "Completed",
        }
    }

    pub fn matches(self, book: &Book) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Reading => !book.is_completed(),
            StatusFilter::Completed => book.is_completed(),
        }
    }
}

/// Every set criterion must hold. An empty filter matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the title or the author.
    pub text: String,
    pub category: Option<Uuid>,
    /// Case-insensitive substring of the author only.
    pub author: String,
    pub min_pages: Option<u32>,
    pub max_pages: Option<u32>,
    pub status: StatusFilter,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        let text = self.text.trim().to_lowercase();
        if !text.is_empty()
            && !book.title.to_lowercase().contains(&text)
            && !book.author.to_lowercase().contains(&text)
        {
            return false;
        }

        let author = self.author.trim().to_lowercase();
        if !author.is_empty() && !book.author.to_lowercase().contains(&author) {
            return false;
        }

        if self.category.is_some() && book.category != self.category {
            return false;
        }
        if self.min_pages.is_some_and(|min| book.total_pages < min) {
            return false;
        }
        if self.max_pages.is_some_and(|max| book.total_pages > max) {
            return false;
        }
        self.status.matches(book)
    }

    pub fn is_active(&self) -> bool {
        !self.text.trim().is_empty()
            || !self.author.trim().is_empty()
            || self.category.is_some()
            || self.min_pages.is_some()
            || self.max_pages.is_some()
            || self.status != StatusFilter::All
    }

    /// Replace the text, author and page criteria from a query line.
    ///
    /// `author:`, `min:` and `max:` prefixes set their criterion; values may
    /// be double-quoted to include spaces. A page bound that is not a number
    /// is kept as free text. Category and status are left alone.
    pub fn apply_query(&mut self, input: &str) {
        self.text.clear();
        self.author.clear();
        self.min_pages = None;
        self.max_pages = None;

        let mut words = Vec::new();
        for token in tokenize(input) {
            let parsed = match token.split_once(':') {
                Some(("author", value)) if !value.is_empty() => {
                    self.author = value.to_string();
                    true
                }
                Some(("min", value)) => value.parse().map(|n| self.min_pages = Some(n)).is_ok(),
                Some(("max", value)) => value.parse().map(|n| self.max_pages = Some(n)).is_ok(),
                _ => false,
            };
            if !parsed {
                words.push(token);
            }
        }
        self.text = words.join(" ");
    }

    /// The query line that [`apply_query`](Self::apply_query) would parse
    /// back into the current text, author and page criteria.
    pub fn query(&self) -> String {
        let mut parts = Vec::new();
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        if !self.author.is_empty() {
            if self.author.contains(' ') {
                parts.push(format!("author:\"{}\"", self.author));
            } else {
                parts.push(format!("author:{}", self.author));
            }
        }
        if let Some(min) = self.min_pages {
            parts.push(format!("min:{min}"));
        }
        if let Some(max) = self.max_pages {
            parts.push(format!("max:{max}"));
        }
        parts.join(" ")
    }
}

/// Split on whitespace, keeping double-quoted runs together.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Shelf sort order. Ties fall back to title, then id, so the order is total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookOrder {
    TitleAsc,
    TitleDesc,
    AuthorAsc,
    AuthorDesc,
    PagesAsc,
    PagesDesc,
    AddedAsc,
    AddedDesc,
    UpdatedAsc,
    #[default]
    UpdatedDesc,
}

impl BookOrder {
    pub const ALL: [BookOrder; 10] = [
        BookOrder::UpdatedDesc,
        BookOrder::UpdatedAsc,
        BookOrder::TitleAsc,
        BookOrder::TitleDesc,
        BookOrder::AuthorAsc,
        BookOrder::AuthorDesc,
        BookOrder::PagesAsc,
        BookOrder::PagesDesc,
        BookOrder::AddedDesc,
        BookOrder::AddedAsc,
    ];

    /// Parse a config key such as `title` or `-updated`. Unknown keys give
    /// the default order.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|o| o.key() == key)
            .unwrap_or_else(|| {
                log::warn!("Unknown shelf order {key:?}; using {}", Self::default().key());
                Self::default()
            })
    }

    pub fn key(self) -> &'static str {
        match self {
            BookOrder::TitleAsc => "title",
            BookOrder::TitleDesc => "-title",
            BookOrder::AuthorAsc => "author",
            BookOrder::AuthorDesc => "-author",
            BookOrder::PagesAsc => "pages",
            BookOrder::PagesDesc => "-pages",
            BookOrder::AddedAsc => "added",
            BookOrder::AddedDesc => "-added",
            BookOrder::UpdatedAsc => "updated",
            BookOrder::UpdatedDesc => "-updated",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookOrder::TitleAsc => "Title A-Z",
            BookOrder::TitleDesc => "Title Z-A",
            BookOrder::AuthorAsc => "Author A-Z",
            BookOrder::AuthorDesc => "Author Z-A",
            BookOrder::PagesAsc => "Shortest",
            BookOrder::PagesDesc => "Longest",
            BookOrder::AddedAsc => "Oldest added",
            BookOrder::AddedDesc => "Newest added",
            BookOrder::UpdatedAsc => "Least recent",
            BookOrder::UpdatedDesc => "Most recent",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|o| *o == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn compare(self, a: &Book, b: &Book) -> Ordering {
        let primary = match self {
            BookOrder::TitleAsc => cmp_text(&a.title, &b.title),
            BookOrder::TitleDesc => cmp_text(&b.title, &a.title),
            BookOrder::AuthorAsc => cmp_text(&a.author, &b.author),
            BookOrder::AuthorDesc => cmp_text(&b.author, &a.author),
            BookOrder::PagesAsc => a.total_pages.cmp(&b.total_pages),
            BookOrder::PagesDesc => b.total_pages.cmp(&a.total_pages),
            BookOrder::AddedAsc => a.added_at.cmp(&b.added_at),
            BookOrder::AddedDesc => b.added_at.cmp(&a.added_at),
            BookOrder::UpdatedAsc => a.updated_at.cmp(&b.updated_at),
            BookOrder::UpdatedDesc => b.updated_at.cmp(&a.updated_at),
        };
        primary
            .then_with(|| cmp_text(&a.title, &b.title))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
