//! Cooperative stop signal for the frame loop.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Cloneable cancellation token.
///
/// The loop checks [`is_stopped`](Self::is_stopped) between iterations and
/// paces itself with [`sleep`](Self::sleep), which wakes as soon as
/// [`stop`](Self::stop) is called. A device call in progress is never
/// interrupted.
#[derive(Clone, Default)]
pub struct StopToken {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop. Idempotent.
    pub fn stop(&self) {
        let mut stopped = self
            .inner
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        self.inner.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self
            .inner
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleeps for `duration` unless stopped first.
    ///
    /// Returns `false` if the sleep ended because of a stop request.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut stopped = self
            .inner
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        loop {
            if *stopped {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            stopped = self
                .inner
                .wake
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_token_starts_running() {
        let token = StopToken::new();
        assert!(!token.is_stopped());
    }

    #[test]
    fn test_stop_is_shared_between_clones() {
        let token = StopToken::new();
        let clone = token.clone();
        clone.stop();
        clone.stop();
        assert!(token.is_stopped());
    }

    #[test]
    fn test_sleep_runs_full_duration() {
        let token = StopToken::new();
        let started = Instant::now();
        assert!(token.sleep(Duration::from_millis(30)));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_zero_sleep_returns_immediately() {
        let token = StopToken::new();
        assert!(token.sleep(Duration::ZERO));
        token.stop();
        assert!(!token.sleep(Duration::ZERO));
    }

    #[test]
    fn test_stop_wakes_sleeper() {
        let token = StopToken::new();
        let sleeper = {
            let token = token.clone();
            thread::spawn(move || {
                let started = Instant::now();
                let completed = token.sleep(Duration::from_secs(10));
                (completed, started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        token.stop();

        let (completed, elapsed) = sleeper.join().unwrap();
        assert!(!completed);
        assert!(elapsed < Duration::from_secs(5));
    }
}
