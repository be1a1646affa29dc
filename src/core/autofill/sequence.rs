//! Latest-request-wins sequencing.
//!
//! Each lookup gets a ticket carrying a monotonically increasing sequence
//! number and a fresh cancellation token. Starting a new request cancels the
//! previous token; a completion is applied only if its sequence number is
//! still the current one.

use tokio_util::sync::CancellationToken;

/// Handle for one lookup request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub seq: u64,
    pub token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    current: u64,
    active: Option<CancellationToken>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is in flight and issue the next ticket.
    pub fn begin(&mut self) -> RequestTicket {
        self.cancel_active();
        self.current += 1;
        let token = CancellationToken::new();
        self.active = Some(token.clone());
        RequestTicket {
            seq: self.current,
            token,
        }
    }

    /// Cancel whatever is in flight and make every issued ticket stale.
    pub fn invalidate(&mut self) {
        self.cancel_active();
        self.current += 1;
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.current
    }

    /// Mark the current request as completed. Stale sequence numbers are
    /// ignored.
    pub fn finish(&mut self, seq: u64) -> bool {
        if self.is_current(seq) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_seq(&self) -> u64 {
        self.current
    }

    fn cancel_active(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let mut seq = RequestSequencer::new();
        let a = seq.begin();
        let b = seq.begin();
        assert!(b.seq > a.seq);
        assert!(seq.is_current(b.seq));
        assert!(!seq.is_current(a.seq));
    }

    #[test]
    fn test_begin_cancels_previous_token() {
        let mut seq = RequestSequencer::new();
        let a = seq.begin();
        assert!(!a.token.is_cancelled());
        let b = seq.begin();
        assert!(a.token.is_cancelled());
        assert!(!b.token.is_cancelled());
    }

    #[test]
    fn test_finish_only_for_current() {
        let mut seq = RequestSequencer::new();
        let a = seq.begin();
        let b = seq.begin();
        assert!(!seq.finish(a.seq));
        assert!(seq.in_flight());
        assert!(seq.finish(b.seq));
        assert!(!seq.in_flight());
        // Finishing does not cancel the token of a completed request.
        assert!(!b.token.is_cancelled());
    }

    #[test]
    fn test_invalidate_makes_all_stale() {
        let mut seq = RequestSequencer::new();
        let a = seq.begin();
        seq.invalidate();
        assert!(a.token.is_cancelled());
        assert!(!seq.is_current(a.seq));
        assert!(!seq.in_flight());
    }
}
