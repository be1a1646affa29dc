//! Autofill search controller.
//!
//! Turns keystrokes into a debounced, cancellable, latest-request-wins
//! sequence of lookups and applies a selected candidate to the add-book
//! form. All state mutation happens on the caller's task: lookups run as
//! spawned tokio tasks and report back through an mpsc channel that
//! [`AutofillController::poll`] drains, so a superseded completion can be
//! checked against the current sequence number before it touches anything.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::debounce::Debouncer;
use super::form::{BookForm, FormField, SearchBox};
use super::results::ResultsView;
use super::sequence::{RequestSequencer, RequestTicket};
use crate::config::SearchConfig;
use crate::core::books::{BookLookup, Candidate, LookupError, LookupResult, RawVolume};

/// Quiet period before a keystroke burst turns into a lookup.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tunables for the search flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutofillPolicy {
    /// Minimum trimmed query length (in characters) that triggers a lookup.
    pub min_chars: usize,
    pub debounce: Duration,
}

impl Default for AutofillPolicy {
    fn default() -> Self {
        Self {
            min_chars: 1,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl From<&SearchConfig> for AutofillPolicy {
    fn from(config: &SearchConfig) -> Self {
        Self {
            min_chars: config.min_query_chars,
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }
}

/// Completion report from a spawned lookup task.
#[derive(Debug)]
pub struct LookupOutcome {
    pub(crate) seq: u64,
    pub(crate) query: String,
    pub(crate) result: LookupResult<Vec<RawVolume>>,
}

/// Transient per-form search state.
#[derive(Debug, Default)]
pub struct SearchSession {
    pub current_query: String,
    pub last_results: Vec<Candidate>,
    pub selected: Option<Candidate>,
    requests: RequestSequencer,
}

pub struct AutofillController {
    lookup: Arc<dyn BookLookup>,
    policy: AutofillPolicy,
    session: SearchSession,
    debouncer: Debouncer<String>,
    form: BookForm,
    search_box: SearchBox,
    results: ResultsView,
    outcome_tx: mpsc::UnboundedSender<LookupOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LookupOutcome>,
}

impl AutofillController {
    pub fn new(lookup: Arc<dyn BookLookup>, form: BookForm, policy: AutofillPolicy) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            policy,
            session: SearchSession::default(),
            debouncer: Debouncer::new(policy.debounce),
            form,
            search_box: SearchBox::default(),
            results: ResultsView::Idle,
            outcome_tx,
            outcome_rx,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn results_view(&self) -> &ResultsView {
        &self.results
    }

    /// The last rendered candidate list.
    pub fn candidates(&self) -> &[Candidate] {
        &self.session.last_results
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.session.selected.as_ref()
    }

    pub fn current_query(&self) -> &str {
        &self.session.current_query
    }

    pub fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search_box
    }

    pub fn is_searching(&self) -> bool {
        self.session.requests.in_flight()
    }

    /// Query waiting for its quiet period to pass.
    pub fn pending_query(&self) -> Option<&str> {
        self.debouncer.pending().map(String::as_str)
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Keystroke in the search box.
    pub fn on_input(&mut self, raw: &str) {
        self.on_input_at(raw, Instant::now());
    }

    pub fn on_input_at(&mut self, raw: &str, now: Instant) {
        if self.session.selected.is_some() {
            log::debug!("Ignoring search input while a book is selected");
            return;
        }
        self.search_box.text = raw.to_string();
        self.debouncer.schedule(raw.to_string(), now);
    }

    /// Fire a due debounced query and apply finished lookups. Call on every
    /// tick.
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    pub fn poll_at(&mut self, now: Instant) {
        if let Some(raw) = self.debouncer.take_ready(now) {
            self.run_query(&raw);
        }
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Wait for the next lookup completion and apply it. Returns whether it
    /// changed the results surface.
    pub async fn next_outcome(&mut self) -> bool {
        match self.outcome_rx.recv().await {
            Some(outcome) => self.apply_outcome(outcome),
            None => false,
        }
    }

    /// Pick candidate `index` from the list on display. Ignored while no
    /// list is shown (searching, error, prompt) and for out-of-range indexes.
    pub fn on_select(&mut self, index: usize) -> bool {
        if !self.results.shows_candidates() {
            log::debug!("Ignoring selection of index {index}; no candidates on display");
            return false;
        }
        let Some(candidate) = self.session.last_results.get(index).cloned() else {
            log::debug!(
                "Ignoring selection of index {index} ({} results on display)",
                self.session.last_results.len()
            );
            return false;
        };

        // Nothing still in flight may replace the confirmation.
        self.session.requests.invalidate();
        self.debouncer.cancel();

        self.apply_candidate(&candidate);
        self.search_box = SearchBox {
            text: candidate.label(),
            locked: true,
        };
        log::info!("Selected book {:?} ({})", candidate.title, candidate.external_id);
        self.results = ResultsView::Selected(candidate.clone());
        self.session.selected = Some(candidate);
        true
    }

    /// Clear the selection and re-enable searching.
    pub fn on_change_selection(&mut self) {
        self.session.selected = None;
        self.form.unlock_all();
        self.search_box.locked = false;
        self.session.last_results.clear();
        self.results = ResultsView::Idle;
    }

    /// Focus left both the search box and the results surface.
    pub fn on_click_outside(&mut self) {
        if self.session.selected.is_none() && !self.results.shows_candidates() {
            self.results = ResultsView::Idle;
        }
    }

    /// Forget everything: selection, results, form values and locks.
    pub fn reset(&mut self) {
        self.session.requests.invalidate();
        self.debouncer.cancel();
        self.session.selected = None;
        self.session.last_results.clear();
        self.session.current_query.clear();
        self.form.reset();
        self.search_box = SearchBox::default();
        self.results = ResultsView::Idle;
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn run_query(&mut self, raw: &str) {
        if self.session.selected.is_some() {
            return;
        }

        let query = raw.trim().to_string();
        self.session.current_query = query.clone();

        if query.is_empty() || query.chars().count() < self.policy.min_chars {
            self.session.requests.invalidate();
            self.session.last_results.clear();
            self.results = ResultsView::NeedMoreInput {
                min_chars: self.policy.min_chars.max(1),
            };
            return;
        }

        let ticket = self.session.requests.begin();
        log::debug!("Starting lookup #{} for {query:?}", ticket.seq);
        self.results = ResultsView::Searching {
            query: query.clone(),
        };
        self.spawn_lookup(ticket, query);
    }

    fn spawn_lookup(&self, ticket: RequestTicket, query: String) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let RequestTicket { seq, token } = ticket;
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(LookupError::Cancelled),
                result = lookup.search(&query, token.clone()) => result,
            };
            let _ = tx.send(LookupOutcome { seq, query, result });
        });
    }

    fn apply_outcome(&mut self, outcome: LookupOutcome) -> bool {
        let LookupOutcome { seq, query, result } = outcome;

        if !self.session.requests.finish(seq) {
            log::debug!("Dropping stale lookup #{seq} for {query:?}");
            return false;
        }

        match result {
            Ok(volumes) => {
                let candidates: Vec<Candidate> = volumes
                    .into_iter()
                    .map(|v| Candidate::from_raw(v, &query))
                    .collect();
                log::debug!("Lookup #{seq} for {query:?} returned {} results", candidates.len());
                self.results = if candidates.is_empty() {
                    ResultsView::NoResults { query }
                } else {
                    ResultsView::Candidates {
                        query,
                        count: candidates.len(),
                    }
                };
                self.session.last_results = candidates;
                true
            }
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                log::warn!("Lookup #{seq} for {query:?} failed: {e}");
                self.results = ResultsView::Error {
                    message: e.to_string(),
                };
                true
            }
        }
    }

    fn apply_candidate(&mut self, candidate: &Candidate) {
        self.form.fill(FormField::Title, &candidate.title);
        self.form.fill(FormField::Author, &candidate.authors_joined());
        self.form.fill(FormField::TotalPages, &candidate.pages_text());
        self.form
            .fill(FormField::Isbn, candidate.isbn.as_deref().unwrap_or_default());
        self.form.fill(FormField::Cover, &candidate.cover_url);
        self.form.fill(FormField::ExternalId, &candidate.external_id);
    }
}
