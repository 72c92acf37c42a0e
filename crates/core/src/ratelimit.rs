//! Sliding-window rate limiter.
//!
//! One process-wide window over all incoming requests; there is no
//! per-caller identity at this layer. Admission is checked before
//! sanitization and cache lookup, so rate limiting is unconditional per
//! incoming request: even a would-be cache hit consumes quota. That is the
//! intended behavior, bounding total request pressure rather than provider
//! calls alone.

use std::time::{Duration, Instant};

/// Sliding-window admission gate.
///
/// Retains the timestamps of admitted requests within the trailing window,
/// pruned lazily on each check. The retained count never exceeds
/// `max_requests`.
#[derive(Debug)]
pub struct SlidingWindow {
    timestamps: Vec<Instant>,
    window: Duration,
    max_requests: usize,
}

impl SlidingWindow {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self { timestamps: Vec::new(), window, max_requests }
    }

    /// Admit or reject a request.
    ///
    /// Prunes timestamps older than the window, then rejects without
    /// recording when the window is full; otherwise records now and admits.
    pub fn check(&mut self) -> bool {
        self.check_at(Instant::now())
    }

    fn check_at(&mut self, now: Instant) -> bool {
        self.timestamps.retain(|t| now.duration_since(*t) < self.window);
        if self.timestamps.len() >= self.max_requests {
            return false;
        }
        self.timestamps.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_max() {
        let mut limiter = SlidingWindow::new(Duration::from_secs(60), 3);
        assert!(limiter.check());
        assert!(limiter.check());
        assert!(limiter.check());
        assert!(!limiter.check());
    }

    #[test]
    fn test_rejection_does_not_consume_quota() {
        let mut limiter = SlidingWindow::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.check_at(start));
        assert!(!limiter.check_at(start));
        assert!(!limiter.check_at(start));
        // Only the single admitted timestamp should age out.
        assert!(limiter.check_at(start + Duration::from_secs(61)));
    }

    #[test]
    fn test_window_slides() {
        let mut limiter = SlidingWindow::new(Duration::from_millis(100), 2);
        let start = Instant::now();

        assert!(limiter.check_at(start));
        assert!(limiter.check_at(start));
        assert!(!limiter.check_at(start + Duration::from_millis(50)));
        assert!(limiter.check_at(start + Duration::from_millis(150)));
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let mut limiter = SlidingWindow::new(Duration::from_millis(100), 1);
        let start = Instant::now();

        assert!(limiter.check_at(start));
        // A timestamp exactly window-old is no longer inside the window.
        assert!(limiter.check_at(start + Duration::from_millis(100)));
    }
}
