//! Debounced Query Controller
//!
//! Holds at most one pending query. Scheduling a new one cancels the prior.
//! Every scheduled or issued query gets a monotonically increasing sequence
//! number; results are applied only for the latest one, so a slow response can
//! never overwrite a newer list.

/// Quiet period before a typed query is issued
pub const DEBOUNCE_MS: u32 = 200;

/// Handle for a scheduled or issued query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    /// When the query becomes due; equals the issue time for immediate queries
    pub due_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingQuery {
    seq: u64,
    query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceController {
    delay_ms: u32,
    latest_seq: u64,
    pending: Option<PendingQuery>,
}

impl Default for DebounceController {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}

impl DebounceController {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            latest_seq: 0,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn next_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }

    /// Start a new quiet period for `query`, replacing any pending one
    pub fn schedule(&mut self, query: impl Into<String>, now_ms: u64) -> QueryTicket {
        let seq = self.next_seq();
        let due_at_ms = now_ms + u64::from(self.delay_ms);
        self.pending = Some(PendingQuery {
            seq,
            query: query.into(),
        });
        QueryTicket { seq, due_at_ms }
    }

    /// Issue `query` right away (focus, post-commit refresh).
    ///
    /// Supersedes both the pending query and anything already in flight.
    pub fn issue_now(&mut self, now_ms: u64) -> QueryTicket {
        self.pending = None;
        QueryTicket {
            seq: self.next_seq(),
            due_at_ms: now_ms,
        }
    }

    /// Timer callback for ticket `seq`.
    ///
    /// Yields the query only if `seq` is still the pending one.
    pub fn fire(&mut self, seq: u64) -> Option<String> {
        match &self.pending {
            Some(p) if p.seq == seq => self.pending.take().map(|p| p.query),
            _ => None,
        }
    }

    /// Drop the pending query without issuing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether results for `seq` may still be applied
    pub fn accepts(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }
}
