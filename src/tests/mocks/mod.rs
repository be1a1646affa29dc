//! Test doubles for the lookup seam.
//!
//! `MockBookLookup` (mockall) covers call-count expectations. The scripted
//! fake here covers timing: each query answers after its own delay, which
//! lets paused-clock tests reorder responses deliberately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::books::{BookLookup, LookupError, LookupResult, RawVolume, VolumeInfo};

// ============================================================================
// Scripted lookup
// ============================================================================

/// Lookup that answers each known query after a fixed delay.
///
/// Unknown queries resolve immediately with no results. Every call is
/// recorded, including ones later cancelled.
#[derive(Default)]
pub struct ScriptedLookup {
    script: HashMap<String, (Duration, LookupResult<Vec<RawVolume>>)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(
        mut self,
        query: &str,
        delay: Duration,
        result: LookupResult<Vec<RawVolume>>,
    ) -> Self {
        self.script.insert(query.to_string(), (delay, result));
        self
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BookLookup for ScriptedLookup {
    async fn search(&self, query: &str, cancel: CancellationToken) -> LookupResult<Vec<RawVolume>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.to_string());
        }

        let Some((delay, result)) = self.script.get(query).cloned() else {
            return Ok(Vec::new());
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(LookupError::Cancelled),
            _ = tokio::time::sleep(delay) => result,
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A titled volume with no authors, pages or identifiers.
pub fn volume(id: &str, title: &str) -> RawVolume {
    RawVolume {
        id: id.to_string(),
        volume_info: VolumeInfo {
            title: Some(title.to_string()),
            ..Default::default()
        },
    }
}

/// A volume with a single author and an optional page count.
pub fn volume_with(id: &str, title: &str, author: &str, pages: Option<u32>) -> RawVolume {
    RawVolume {
        id: id.to_string(),
        volume_info: VolumeInfo {
            title: Some(title.to_string()),
            authors: vec![author.to_string()],
            page_count: pages,
            ..Default::default()
        },
    }
}
