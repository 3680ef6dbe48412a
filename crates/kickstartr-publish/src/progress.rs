//! Upload progress reporting.

use std::sync::atomic::{AtomicI16, AtomicU64, Ordering};
use std::sync::Arc;

/// Callback receiving upload percentages
pub type ProgressSink = Arc<dyn Fn(u8) + Send + Sync>;

/// Turns bytes-sent into percentage events.
///
/// Percentages are rounded like the storefront's progress bar and only
/// emitted when they increase, so a sink sees a strictly increasing sequence.
/// Clones share state; hand one to the body stream and keep one for `finish`.
#[derive(Clone)]
pub struct ProgressTracker {
    inner: Arc<Inner>,
}

struct Inner {
    total: u64,
    sent: AtomicU64,
    /// Last emitted percentage, -1 before the first event
    last: AtomicI16,
    sink: Option<ProgressSink>,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("total", &self.inner.total)
            .field("sent", &self.sent())
            .field("percent", &self.percent())
            .finish()
    }
}

impl ProgressTracker {
    pub fn new(total: u64, sink: Option<ProgressSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                total,
                sent: AtomicU64::new(0),
                last: AtomicI16::new(-1),
                sink,
            }),
        }
    }

    /// Tracker that only counts.
    pub fn silent(total: u64) -> Self {
        Self::new(total, None)
    }

    pub fn total(&self) -> u64 {
        self.inner.total
    }

    pub fn sent(&self) -> u64 {
        self.inner.sent.load(Ordering::SeqCst)
    }

    /// Last emitted percentage, `None` before the first event.
    pub fn percent(&self) -> Option<u8> {
        u8::try_from(self.inner.last.load(Ordering::SeqCst)).ok()
    }

    /// Record `bytes` more as sent.
    pub fn advance(&self, bytes: u64) {
        let sent = self
            .inner
            .sent
            .fetch_add(bytes, Ordering::SeqCst)
            .saturating_add(bytes);
        self.emit(percent_of(sent, self.inner.total));
    }

    /// Report completion. Emits 100 unless it was already emitted.
    pub fn finish(&self) {
        self.emit(100);
    }

    fn emit(&self, percent: u8) {
        let previous = self
            .inner
            .last
            .fetch_max(i16::from(percent), Ordering::SeqCst);
        if i16::from(percent) > previous {
            if let Some(sink) = &self.inner.sink {
                sink(percent);
            }
        }
    }
}

/// Rounded percentage, clamped to 100. An empty upload is complete.
fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = u128::from(sent.min(total));
    let total = u128::from(total);
    ((sent * 100 + total / 2) / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording(total: u64) -> (ProgressTracker, Arc<Mutex<Vec<u8>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = events.clone();
        let tracker = ProgressTracker::new(
            total,
            Some(Arc::new(move |p| sink_events.lock().unwrap().push(p))),
        );
        (tracker, events)
    }

    #[test]
    fn percent_of_rounds() {
        assert_eq!(percent_of(0, 200), 0);
        assert_eq!(percent_of(1, 200), 1);
        assert_eq!(percent_of(199, 200), 100);
        assert_eq!(percent_of(500, 200), 100);
        assert_eq!(percent_of(0, 0), 100);
    }

    #[test]
    fn emits_increasing_sequence_ending_at_100() {
        let (tracker, events) = recording(1000);
        for _ in 0..10 {
            tracker.advance(100);
        }
        tracker.finish();
        let events = events.lock().unwrap().clone();
        assert_eq!(events, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn duplicate_percentages_are_suppressed() {
        let (tracker, events) = recording(1_000_000);
        tracker.advance(1);
        tracker.advance(1);
        tracker.advance(10_000);
        let events = events.lock().unwrap().clone();
        assert_eq!(events, vec![0, 1]);
        assert_eq!(tracker.sent(), 10_002);
    }

    #[test]
    fn finish_without_advance_emits_100_once() {
        let (tracker, events) = recording(0);
        assert_eq!(tracker.percent(), None);
        tracker.finish();
        tracker.finish();
        assert_eq!(events.lock().unwrap().clone(), vec![100]);
        assert_eq!(tracker.percent(), Some(100));
    }

    #[test]
    fn clones_share_state() {
        let (tracker, events) = recording(10);
        let clone = tracker.clone();
        clone.advance(5);
        tracker.advance(5);
        assert_eq!(tracker.sent(), 10);
        assert_eq!(events.lock().unwrap().clone(), vec![50, 100]);
    }
}
