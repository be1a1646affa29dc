//! Normalized book candidates.
//!
//! A [`Candidate`] is what the results list shows and what a selection
//! copies into the add-book form. Normalization resolves the ISBN and the
//! cover URL so the rest of the app never looks at raw payloads.

use serde::{Deserialize, Serialize};

use super::volume::{RawVolume, ISBN_10, ISBN_13};

/// Cover service keyed by ISBN.
pub const ISBN_COVER_BASE: &str = "https://covers.openlibrary.org/b/isbn";
/// Generated initials placeholder keyed by title (or query).
pub const PLACEHOLDER_COVER_BASE: &str = "https://api.dicebear.com/7.x/initials/svg";

/// Shown wherever a candidate has no title.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub authors: Vec<String>,
    pub page_count: Option<u32>,
    pub isbn: Option<String>,
    pub cover_url: String,
    pub external_id: String,
}

impl Candidate {
    /// Normalize a raw search hit. `query` seeds the placeholder cover when
    /// the volume has neither a title nor an ISBN.
    pub fn from_raw(raw: RawVolume, query: &str) -> Self {
        let info = raw.volume_info;

        let isbn = info
            .identifier(ISBN_13)
            .or_else(|| info.identifier(ISBN_10))
            .map(str::to_string);

        let title = info
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let provider_cover = info
            .image_links
            .as_ref()
            .and_then(|links| links.candidates().next())
            .map(upgrade_to_https);

        let cover_url = match (provider_cover, isbn.as_deref()) {
            (Some(url), _) => url,
            (None, Some(isbn)) => isbn_cover_url(isbn),
            (None, None) => {
                let seed = if title.is_empty() { query.trim() } else { title.as_str() };
                placeholder_cover_url(seed)
            }
        };

        let authors = info
            .authors
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Self {
            title,
            authors,
            page_count: info.page_count,
            isbn,
            cover_url,
            external_id: raw.id,
        }
    }

    /// Authors joined for display and for the author field, empty if none.
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }

    /// Page count as form text. Zero pages counts as unknown.
    pub fn pages_text(&self) -> String {
        match self.page_count {
            Some(n) if n > 0 => n.to_string(),
            _ => String::new(),
        }
    }

    /// Human-readable label: title plus the first author when present.
    pub fn label(&self) -> String {
        let title = if self.title.is_empty() {
            UNTITLED
        } else {
            self.title.as_str()
        };
        match self.authors.first() {
            Some(author) => format!("{title} \u{2014} {author}"),
            None => title.to_string(),
        }
    }
}

fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_string(),
    }
}

pub fn isbn_cover_url(isbn: &str) -> String {
    format!("{ISBN_COVER_BASE}/{}-M.jpg", urlencoding::encode(isbn))
}

pub fn placeholder_cover_url(seed: &str) -> String {
    format!("{PLACEHOLDER_COVER_BASE}?seed={}", urlencoding::encode(seed))
}
