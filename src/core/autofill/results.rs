//! What the results surface currently shows. The controller replaces it
//! wholesale on every transition; the TUI renders it.

use crate::core::books::Candidate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    /// Nothing searched yet (or selection cleared).
    Idle,
    /// Query too short to search.
    NeedMoreInput { min_chars: usize },
    /// Lookup in flight.
    Searching { query: String },
    /// Successful lookup with zero hits.
    NoResults { query: String },
    /// Selectable list; the candidates live in the session's result set.
    Candidates { query: String, count: usize },
    /// Lookup failed for a reason other than cancellation.
    Error { message: String },
    /// Confirmation summary with a "change selection" action.
    Selected(Candidate),
}

impl ResultsView {
    /// Single-line message for the non-list states.
    pub fn message(&self) -> String {
        match self {
            Self::Idle => "No book searched yet".to_string(),
            Self::NeedMoreInput { min_chars } => {
                let plural = if *min_chars == 1 { "" } else { "s" };
                format!("Type at least {min_chars} character{plural}\u{2026}")
            }
            Self::Searching { .. } => "Searching\u{2026}".to_string(),
            Self::NoResults { .. } => "No results".to_string(),
            Self::Candidates { count, .. } => {
                let plural = if *count == 1 { "" } else { "s" };
                format!("{count} result{plural}")
            }
            Self::Error { message } => format!("Search failed: {message}"),
            Self::Selected(_) => "Book selected.".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn shows_candidates(&self) -> bool {
        matches!(self, Self::Candidates { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_chars_pluralization() {
        assert_eq!(
            ResultsView::NeedMoreInput { min_chars: 1 }.message(),
            "Type at least 1 character\u{2026}"
        );
        assert_eq!(
            ResultsView::NeedMoreInput { min_chars: 2 }.message(),
            "Type at least 2 characters\u{2026}"
        );
    }

    #[test]
    fn test_no_results_distinct_from_error() {
        let empty = ResultsView::NoResults { query: "zz".into() };
        let failed = ResultsView::Error {
            message: "Network error: reset".into(),
        };
        assert_ne!(empty.message(), failed.message());
        assert!(!empty.is_error());
        assert!(failed.is_error());
    }
}
