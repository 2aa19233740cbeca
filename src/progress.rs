//! Progress reporting & cancellation (§4.K, §6 "Progress & cancellation").
//!
//! The descriptor/FFI plumbing around the progress callback is out of scope
//! (spec.md §1); what belongs to the core is the throttling and the shared
//! cancellation flag workers poll between origins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Minimum interval between successive progress reports (spec.md §6 "The
/// core throttles progress reports to >= 100ms intervals").
pub const THROTTLE: Duration = Duration::from_millis(100);

/// Caller-supplied progress sink. Returning `true` requests cancellation
/// (spec.md §6 "non-zero return cancels").
pub trait ProgressReporter: Send + Sync {
    fn report(&self, processed: usize, total: usize) -> bool;
}

impl<F: Fn(usize, usize) -> bool + Send + Sync> ProgressReporter for F {
    fn report(&self, processed: usize, total: usize) -> bool {
        self(processed, total)
    }
}

/// Throttles an optional [`ProgressReporter`] to at most once per
/// [`THROTTLE`] and latches a shared cancellation flag once the reporter
/// asks for it. The flag is the "single shared boolean... treat as a hint"
/// of spec.md §5, promoted here to `AtomicBool` as that section allows.
pub struct ThrottledProgress<'a> {
    inner: Option<&'a dyn ProgressReporter>,
    last: Mutex<Instant>,
    cancel: AtomicBool,
}

impl<'a> ThrottledProgress<'a> {
    pub fn new(inner: Option<&'a dyn ProgressReporter>) -> Self {
        ThrottledProgress {
            inner,
            last: Mutex::new(Instant::now() - THROTTLE),
            cancel: AtomicBool::new(false),
        }
    }

    pub fn cancel_flag(&self) -> &AtomicBool {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Called by a worker after finishing an origin. Only the first caller
    /// to observe a stale `last` within the throttle window actually
    /// invokes the reporter; callers racing for that slot is harmless,
    /// they just both see the same up-to-date `processed` count.
    pub fn maybe_report(&self, processed: usize, total: usize) {
        let Some(reporter) = self.inner else { return };
        {
            let mut last = self.last.lock().unwrap();
            if last.elapsed() < THROTTLE {
                return;
            }
            *last = Instant::now();
        }
        if reporter.report(processed, total) {
            self.request_cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn second_report_within_throttle_window_is_dropped() {
        let calls = AtomicUsize::new(0);
        let reporter = |_p: usize, _t: usize| -> bool {
            calls.fetch_add(1, Ordering::Relaxed);
            false
        };
        let progress = ThrottledProgress::new(Some(&reporter));
        progress.maybe_report(1, 10);
        progress.maybe_report(2, 10);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn reporter_returning_true_sets_cancel_flag() {
        let reporter = |_p: usize, _t: usize| true;
        let progress = ThrottledProgress::new(Some(&reporter));
        assert!(!progress.is_cancelled());
        progress.maybe_report(1, 10);
        assert!(progress.is_cancelled());
    }

    #[test]
    fn no_reporter_never_cancels() {
        let progress = ThrottledProgress::new(None);
        progress.maybe_report(1, 10);
        assert!(!progress.is_cancelled());
    }
}
