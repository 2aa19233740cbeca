//! Work dispatcher (§4.K): worker pool over per-origin analysis kernels.
//!
//! Grounded on graphrs' betweenness `rayon::current_num_threads()` /
//! `into_par_iter()` reduction pattern
//! (`examples/malcolmvr-graphrs/src/.../betweenness.rs`), generalized per
//! spec.md §4.K into an explicit atomic "next origin" counter shared by a
//! fixed pool of `rayon::scope` workers, so a throttled progress callback
//! and cancellation flag (§5) can be threaded through independently of
//! rayon's own work-stealing.

use crate::progress::ThrottledProgress;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Runs `work` once per origin in `0..n_origins` across
/// `rayon::current_num_threads()` workers sharing one atomic counter.
/// Returns one result per origin, in origin order, independent of which
/// worker produced it or in what order workers finished — callers reduce
/// over this array in that fixed order to keep float-sum results
/// reproducible across thread counts (spec.md §5). A result is `None` only
/// for origins left unprocessed by cancellation (spec.md "a partially-filled
/// result").
pub fn run_per_origin<R, F>(n_origins: usize, progress: &ThrottledProgress, work: F) -> Vec<Option<R>>
where
    R: Send,
    F: Fn(u32) -> R + Sync,
{
    if n_origins == 0 {
        return Vec::new();
    }
    let n_workers = rayon::current_num_threads().max(1).min(n_origins);
    let counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let results: Mutex<Vec<Option<R>>> = Mutex::new((0..n_origins).map(|_| None).collect());

    rayon::scope(|scope| {
        for _ in 0..n_workers {
            scope.spawn(|_| loop {
                if progress.is_cancelled() {
                    return;
                }
                let i = counter.fetch_add(1, Ordering::Relaxed);
                if i >= n_origins {
                    return;
                }
                let r = work(i as u32);
                results.lock().unwrap()[i] = Some(r);
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                progress.maybe_report(done, n_origins);
            });
        }
    });

    results.into_inner().unwrap()
}

/// Sums per-origin per-line contributions into `out`, iterating origins in
/// a fixed order first and lines second, so the total does not depend on
/// worker scheduling (spec.md §5 "deterministic irrespective of worker
/// count").
pub fn reduce_sum(out: &mut [f64], per_origin: &[Option<Vec<f64>>]) {
    for contribution in per_origin.iter().flatten() {
        for (o, c) in out.iter_mut().zip(contribution.iter()) {
            *o += c;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_once_per_origin_and_preserves_order() {
        let progress = ThrottledProgress::new(None);
        let results = run_per_origin(5, &progress, |i| i * 2);
        let values: Vec<u32> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn empty_input_returns_empty() {
        let progress = ThrottledProgress::new(None);
        let results: Vec<Option<u32>> = run_per_origin(0, &progress, |i| i);
        assert!(results.is_empty());
    }

    #[test]
    fn reduce_sum_adds_worker_contributions_line_major() {
        let mut out = vec![0.0, 0.0, 0.0];
        let per_origin = vec![
            Some(vec![1.0, 2.0, 3.0]),
            None,
            Some(vec![0.5, 0.5, 0.5]),
        ];
        reduce_sum(&mut out, &per_origin);
        assert_eq!(out, vec![1.5, 2.5, 3.5]);
    }
}
