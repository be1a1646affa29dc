//! Raw volume records as returned by the book-metadata service.
//!
//! Only the fields the autofill flow consumes are modelled; everything
//! else in the payload is ignored by serde.

use serde::{Deserialize, Serialize};

/// Industry identifier type for a 13-digit ISBN.
pub const ISBN_13: &str = "ISBN_13";
/// Industry identifier type for a 10-digit ISBN.
pub const ISBN_10: &str = "ISBN_10";

/// Top-level search response. A query with no hits omits `items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<RawVolume>,
}

/// One search hit before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVolume {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub small_thumbnail: Option<String>,
}

impl ImageLinks {
    /// Cover URLs in order of preference, skipping blanks.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        [self.thumbnail.as_deref(), self.small_thumbnail.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// A typed identifier such as `{"type": "ISBN_13", "identifier": "978..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

impl IndustryIdentifier {
    pub fn new(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }
}

impl VolumeInfo {
    /// First identifier of the given type, if any.
    pub fn identifier(&self, kind: &str) -> Option<&str> {
        self.industry_identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.trim())
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_items_is_empty() {
        let resp: VolumesResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.items.is_empty());
    }

    #[test]
    fn test_parse_full_volume() {
        let json = r#"{
            "items": [{
                "id": "abc123",
                "volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert"],
                    "pageCount": 412,
                    "imageLinks": {"thumbnail": "http://books.example/dune.jpg"},
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "0441013597"},
                        {"type": "ISBN_13", "identifier": "9780441013593"}
                    ]
                }
            }]
        }"#;
        let resp: VolumesResponse = serde_json::from_str(json).unwrap();
        let vol = &resp.items[0];
        assert_eq!(vol.id, "abc123");
        assert_eq!(vol.volume_info.title.as_deref(), Some("Dune"));
        assert_eq!(vol.volume_info.page_count, Some(412));
        assert_eq!(vol.volume_info.identifier(ISBN_13), Some("9780441013593"));
        assert_eq!(vol.volume_info.identifier(ISBN_10), Some("0441013597"));
    }

    #[test]
    fn test_parse_sparse_volume() {
        let json = r#"{"items": [{"id": "x", "volumeInfo": {}}]}"#;
        let resp: VolumesResponse = serde_json::from_str(json).unwrap();
        let info = &resp.items[0].volume_info;
        assert!(info.title.is_none());
        assert!(info.authors.is_empty());
        assert!(info.image_links.is_none());
        assert!(info.identifier(ISBN_13).is_none());
    }

    #[test]
    fn test_image_candidates_skip_blank() {
        let links = ImageLinks {
            thumbnail: Some("  ".into()),
            small_thumbnail: Some("https://img/small.jpg".into()),
        };
        let urls: Vec<&str> = links.candidates().collect();
        assert_eq!(urls, vec!["https://img/small.jpg"]);
    }
}
