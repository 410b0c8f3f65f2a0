//! Bounded polling of server-side jobs.
//!
//! Research tasks and studio artifacts are both observed by calling a poll
//! operation until a terminal predicate holds or the wait budget runs out.
//! Errors from a poll end the loop immediately; retrying is the caller's call.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::progress::ProgressReporter;
use crate::NblmError;

/// Shortest pause between two polls, whatever the policy asks for.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Interval between polls and the total time budget.
///
/// A zero `max_wait` polls exactly once. Intervals below
/// [`MIN_POLL_INTERVAL`] are raised to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl PollPolicy {
    pub fn from_secs(interval: u64, max_wait: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval),
            max_wait: Duration::from_secs(max_wait),
        }
    }

    pub fn single_shot() -> Self {
        Self::from_secs(0, 0)
    }
}

/// Latest snapshot plus how long it took to get there.
#[derive(Debug, Clone)]
pub struct PollReport<T> {
    pub snapshot: T,
    pub polls: u32,
    pub elapsed: Duration,
    /// False when the budget ran out before the terminal predicate held.
    pub finished: bool,
}

impl<T> PollReport<T> {
    /// Elapsed seconds rounded to one decimal.
    pub fn elapsed_secs(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 10.0).round() / 10.0
    }
}

/// Poll until `is_terminal` holds or `policy.max_wait` is exhausted.
///
/// The sleep between polls never overshoots the remaining budget.
pub async fn poll_until<T, F, Fut, P>(
    policy: PollPolicy,
    mut poll: F,
    is_terminal: P,
    progress: &dyn ProgressReporter,
) -> Result<PollReport<T>, NblmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NblmError>>,
    P: Fn(&T) -> bool,
{
    let start = Instant::now();
    let interval = policy.interval.max(MIN_POLL_INTERVAL);
    let mut polls = 0u32;

    loop {
        let snapshot = poll().await?;
        polls += 1;
        let elapsed = start.elapsed();
        let finished = is_terminal(&snapshot);

        progress
            .report(
                elapsed.as_secs_f64(),
                policy.max_wait.as_secs_f64(),
                Some(if finished {
                    format!("Finished after {polls} poll(s)")
                } else {
                    format!("Still running after {polls} poll(s)")
                }),
            )
            .await;

        if finished || elapsed >= policy.max_wait {
            debug!(polls, elapsed_ms = elapsed.as_millis() as u64, finished, "polling stopped");
            return Ok(PollReport {
                snapshot,
                polls,
                elapsed,
                finished,
            });
        }

        let remaining = policy.max_wait - elapsed;
        sleep(interval.min(remaining)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::noop_progress;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingReporter {
        count: AtomicUsize,
    }

    #[async_trait]
    impl ProgressReporter for CountingReporter {
        async fn report(&self, _current: f64, _total: f64, _message: Option<String>) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Poll function returning `states` in order, repeating the last one.
    fn scripted(states: Vec<u8>) -> (impl FnMut() -> std::future::Ready<Result<u8, NblmError>>, std::sync::Arc<AtomicUsize>) {
        let calls = std::sync::Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let f = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let state = states.get(n).or(states.last()).copied().unwrap_or(0);
            std::future::ready(Ok(state))
        };
        (f, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_wait_polls_once_without_sleeping() {
        let (poll, calls) = scripted(vec![0]);
        let before = Instant::now();
        let report = poll_until(PollPolicy::single_shot(), poll, |s| *s == 1, noop_progress().as_ref())
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.polls, 1);
        assert!(!report.finished);
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_at_terminal_poll() {
        let (poll, calls) = scripted(vec![0, 0, 1, 0]);
        let report = poll_until(PollPolicy::from_secs(30, 300), poll, |s| *s == 1, noop_progress().as_ref())
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.polls, 3);
        assert!(report.finished);
        assert_eq!(report.snapshot, 1);
        assert_eq!(report.elapsed, Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_returns_latest_snapshot() {
        let (poll, _) = scripted(vec![0]);
        let reporter = CountingReporter {
            count: AtomicUsize::new(0),
        };
        let report = poll_until(PollPolicy::from_secs(30, 70), poll, |s| *s == 1, &reporter)
            .await
            .unwrap();

        // Polls at 0s, 30s, 60s, then a capped 10s sleep to 70s.
        assert_eq!(report.polls, 4);
        assert!(!report.finished);
        assert_eq!(report.elapsed, Duration::from_secs(70));
        assert_eq!(reporter.count.load(Ordering::Relaxed), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised_to_floor() {
        let (poll, calls) = scripted(vec![0]);
        let report = poll_until(PollPolicy::from_secs(0, 5), poll, |s| *s == 1, noop_progress().as_ref())
            .await
            .unwrap();

        // One poll per second from 0s through 5s.
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(report.polls, 6);
        assert!(!report.finished);
        assert_eq!(report.elapsed, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_stops_immediately() {
        let mut calls = 0;
        let result: Result<PollReport<u8>, _> = poll_until(
            PollPolicy::from_secs(30, 300),
            || {
                calls += 1;
                std::future::ready(Err(NblmError::Transport("reset".into())))
            },
            |_| false,
            noop_progress().as_ref(),
        )
        .await;

        assert!(matches!(result, Err(NblmError::Transport(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_elapsed_rounding() {
        let report = PollReport {
            snapshot: (),
            polls: 1,
            elapsed: Duration::from_millis(12_345),
            finished: true,
        };
        assert_eq!(report.elapsed_secs(), 12.3);
    }
}
