//! Google Books volume search adapter.

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::lookup::{BookLookup, LookupError, LookupResult};
use super::volume::{RawVolume, VolumesResponse};
use crate::config::SearchConfig;

/// Partial-response selector: only the fields normalization reads.
const VOLUME_FIELDS: &str = "items(id,volumeInfo/title,volumeInfo/authors,volumeInfo/pageCount,volumeInfo/imageLinks,volumeInfo/industryIdentifiers)";

/// Google Books provider.
///
/// No request timeout is configured: a slow request is only ever abandoned
/// by cancellation when a newer query supersedes it.
pub struct GoogleBooksClient {
    base_url: String,
    max_results: u32,
    client: Client,
}

impl GoogleBooksClient {
    pub fn new(base_url: impl Into<String>, max_results: u32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.base_url.clone(), config.max_results)
    }

    fn volumes_url(&self) -> String {
        format!("{}/books/v1/volumes", self.base_url)
    }

    #[instrument(skip(self), fields(max_results = self.max_results))]
    async fn fetch(&self, query: &str) -> LookupResult<Vec<RawVolume>> {
        let max_results = self.max_results.to_string();
        let response = self
            .client
            .get(self.volumes_url())
            .query(&[
                ("q", query),
                ("printType", "books"),
                ("maxResults", max_results.as_str()),
                ("fields", VOLUME_FIELDS),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Service {
                status: status.as_u16(),
            });
        }

        let body: VolumesResponse = response.json().await?;
        Ok(body.items)
    }
}

#[async_trait]
impl BookLookup for GoogleBooksClient {
    async fn search(&self, query: &str, cancel: CancellationToken) -> LookupResult<Vec<RawVolume>> {
        if cancel.is_cancelled() {
            return Err(LookupError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("Google Books lookup for {query:?} cancelled in flight");
                Err(LookupError::Cancelled)
            }
            result = self.fetch(query) => result,
        }
    }
}
