//! Lookup service seam.
//!
//! The autofill controller only knows this trait. The production adapter is
//! [`super::google::GoogleBooksClient`]; tests substitute mocks or scripted
//! fakes.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
use mockall::automock;

use super::volume::RawVolume;

pub type LookupResult<T> = Result<T, LookupError>;

/// Failure modes of a lookup.
///
/// `Cancelled` is the expected outcome of a superseded request and is never
/// shown to the user. Everything else is surfaced once, inline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Lookup service returned HTTP {status}")]
    Service { status: u16 },

    #[error("Malformed lookup response: {0}")]
    Decode(String),
}

impl LookupError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LookupError::Cancelled)
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LookupError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            LookupError::Service {
                status: status.as_u16(),
            }
        } else {
            LookupError::Network(e.to_string())
        }
    }
}

/// Asynchronous book search.
///
/// Implementations should return `Err(LookupError::Cancelled)` promptly once
/// `cancel` fires. The controller also races the call against the token, so
/// an implementation that ignores it only wastes bandwidth.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Search for volumes matching `query`.
    async fn search(&self, query: &str, cancel: CancellationToken) -> LookupResult<Vec<RawVolume>>;
}
