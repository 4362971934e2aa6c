//! Debounced card search.

use crate::domain::Card;
use chrono::{DateTime, Duration, Utc};

/// Quiet period after the last keystroke before a search runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

type ResultCallback = Box<dyn FnOnce(Vec<Card>, usize)>;

struct PendingSearch {
    cards: Vec<Card>,
    query: String,
    due: DateTime<Utc>,
    on_result: ResultCallback,
}

/// Debounced substring search over a card list.
///
/// Each [`search`](Self::search) call replaces the pending request, so only
/// the last query typed within a window is evaluated. Time is passed in
/// explicitly; the host drives [`poll`](Self::poll) from its timer.
///
/// # Examples
///
/// ```
/// use flashdeck::domain::Card;
/// use flashdeck::search::SearchIndex;
/// use chrono::{Duration, Utc};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let now = Utc::now();
/// let cards = vec![
///     Card::new("hola".into(), "hello".into(), now),
///     Card::new("adiós".into(), "goodbye".into(), now),
/// ];
///
/// let mut index = SearchIndex::new(150);
/// let hits = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&hits);
/// index.search(&cards, "HEL", now, move |_, count| sink.set(count));
///
/// assert!(!index.poll(now));
/// assert!(index.poll(now + Duration::milliseconds(150)));
/// assert_eq!(hits.get(), 1);
/// ```
pub struct SearchIndex {
    window: Duration,
    pending: Option<PendingSearch>,
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("window", &self.window)
            .field("pending", &self.pending.as_ref().map(|p| (&p.query, p.due)))
            .finish()
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl SearchIndex {
    #[must_use]
    pub fn new(debounce_ms: u64) -> Self {
        let millis = i64::try_from(debounce_ms).unwrap_or(i64::MAX);
        Self {
            window: Duration::milliseconds(millis),
            pending: None,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Schedules a search of `cards` for `query`, due one window after `now`.
    ///
    /// A request that was still pending is dropped without its callback ever
    /// running.
    pub fn search<F>(&mut self, cards: &[Card], query: &str, now: DateTime<Utc>, on_result: F)
    where
        F: FnOnce(Vec<Card>, usize) + 'static,
    {
        if let Some(previous) = self.pending.take() {
            tracing::trace!(query = %previous.query, "pending search superseded");
        }
        self.pending = Some(PendingSearch {
            cards: cards.to_vec(),
            query: query.to_string(),
            due: now + self.window,
            on_result: Box::new(on_result),
        });
    }

    /// Runs the pending request if its window has elapsed.
    ///
    /// Returns `true` when a callback was invoked.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        let due = match &self.pending {
            Some(pending) => pending.due,
            None => return false,
        };
        if now < due {
            return false;
        }

        let Some(pending) = self.pending.take() else {
            return false;
        };
        let _span = tracing::debug_span!(
            "search",
            total_cards = pending.cards.len(),
            query_len = pending.query.len()
        )
        .entered();

        let filtered = filter_cards(&pending.cards, &pending.query);
        let count = filtered.len();
        tracing::debug!(match_count = count, "search settled");
        (pending.on_result)(filtered, count);
        true
    }

    /// Drops the pending request, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::trace!("pending search cancelled");
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending request is due, for scheduling a timer.
    #[must_use]
    pub fn due_in(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| (p.due - now).max(Duration::zero()))
    }
}

/// Cards whose front or back contains `query`, ignoring case.
///
/// A blank query returns every card unchanged.
#[must_use]
pub fn filter_cards(cards: &[Card], query: &str) -> Vec<Card> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return cards.to_vec();
    }
    cards.iter().filter(|c| c.matches(&needle)).cloned().collect()
}
