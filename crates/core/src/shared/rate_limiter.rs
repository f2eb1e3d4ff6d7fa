use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{DEFAULT_MAX_DAILY_CALLS, DEFAULT_MAX_PER_MINUTE};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const MINUTE: Duration = Duration::from_secs(60);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Daily AI limit reached for {service}. Try again tomorrow.")]
    DailyLimit { service: String },
    #[error("Rate limit hit for {service}. Slow down.")]
    MinuteLimit { service: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    pub max_daily_calls: u32,
    pub max_per_minute: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            max_daily_calls: DEFAULT_MAX_DAILY_CALLS,
            max_per_minute: DEFAULT_MAX_PER_MINUTE,
        }
    }
}

#[derive(Debug)]
struct Windows {
    calls_today: u32,
    minute_calls: u32,
    day_window_start: Instant,
    minute_window_start: Instant,
}

/// Call budget for paid external services, shared by every caller that
/// holds the same instance.
///
/// Two windows are tracked: a rolling day and a rolling minute. A window is
/// reset lazily by the first admission check made after it has elapsed.
/// Check and increment happen under one lock, so concurrent callers can never
/// be admitted past either budget.
#[derive(Debug)]
pub struct RateLimiter {
    limits: RateLimits,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(limits: RateLimits) -> Self {
        Self::starting_at(limits, Instant::now())
    }

    /// Create a limiter whose windows both open at `start`.
    pub fn starting_at(limits: RateLimits, start: Instant) -> Self {
        Self {
            limits,
            windows: Mutex::new(Windows {
                calls_today: 0,
                minute_calls: 0,
                day_window_start: start,
                minute_window_start: start,
            }),
        }
    }

    pub fn limits(&self) -> RateLimits {
        self.limits
    }

    pub fn admit(&self, service: &str) -> Result<(), RateLimitError> {
        self.admit_at(service, Instant::now())
    }

    /// Admission check against an explicit clock reading.
    pub fn admit_at(&self, service: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if now.saturating_duration_since(windows.day_window_start) > DAY {
            windows.calls_today = 0;
            windows.day_window_start = now;
        }
        if now.saturating_duration_since(windows.minute_window_start) > MINUTE {
            windows.minute_calls = 0;
            windows.minute_window_start = now;
        }

        if windows.calls_today >= self.limits.max_daily_calls {
            log::warn!("Daily call budget exhausted for {service}");
            return Err(RateLimitError::DailyLimit {
                service: service.to_string(),
            });
        }
        if windows.minute_calls >= self.limits.max_per_minute {
            log::warn!("Per-minute call budget exhausted for {service}");
            return Err(RateLimitError::MinuteLimit {
                service: service.to_string(),
            });
        }

        windows.calls_today += 1;
        windows.minute_calls += 1;
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn limits(max_daily_calls: u32, max_per_minute: u32) -> RateLimits {
        RateLimits {
            max_daily_calls,
            max_per_minute,
        }
    }

    #[test]
    fn test_default_limits() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.limits().max_daily_calls, 10);
        assert_eq!(limiter.limits().max_per_minute, 3);
    }

    #[test]
    fn test_minute_budget_rejects_next_call() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(limits(10, 3), t0);
        for _ in 0..3 {
            limiter.admit_at("whisper", t0).unwrap();
        }
        let err = limiter
            .admit_at("whisper", t0 + Duration::from_secs(30))
            .unwrap_err();
        assert_eq!(
            err,
            RateLimitError::MinuteLimit {
                service: "whisper".to_string()
            }
        );
    }

    #[test]
    fn test_minute_window_resets_after_elapsing() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(limits(10, 3), t0);
        for _ in 0..3 {
            limiter.admit_at("whisper", t0).unwrap();
        }
        assert!(limiter
            .admit_at("whisper", t0 + Duration::from_secs(61))
            .is_ok());
    }

    #[test]
    fn test_minute_window_boundary_is_exclusive() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(limits(10, 1), t0);
        limiter.admit_at("chat", t0).unwrap();
        assert!(limiter.admit_at("chat", t0 + MINUTE).is_err());
        assert!(limiter
            .admit_at("chat", t0 + MINUTE + Duration::from_millis(1))
            .is_ok());
    }

    #[test]
    fn test_daily_budget_rejects_once_exhausted() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(limits(2, 100), t0);
        limiter.admit_at("chat", t0).unwrap();
        limiter.admit_at("chat", t0).unwrap();
        let err = limiter.admit_at("chat", t0).unwrap_err();
        assert!(matches!(err, RateLimitError::DailyLimit { .. }));
        assert!(err.to_string().contains("Try again tomorrow"));
    }

    #[test]
    fn test_daily_window_resets_after_a_day() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(limits(1, 100), t0);
        limiter.admit_at("chat", t0).unwrap();
        assert!(limiter.admit_at("chat", t0 + Duration::from_secs(3600)).is_err());
        assert!(limiter
            .admit_at("chat", t0 + DAY + Duration::from_secs(1))
            .is_ok());
    }

    #[test]
    fn test_rejected_call_is_not_counted() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(limits(4, 3), t0);
        for _ in 0..3 {
            limiter.admit_at("chat", t0).unwrap();
        }
        // Rejected by the minute budget; must not consume the daily one.
        assert!(limiter.admit_at("chat", t0).is_err());
        let later = t0 + Duration::from_secs(90);
        assert!(limiter.admit_at("chat", later).is_ok());
        let err = limiter.admit_at("chat", later).unwrap_err();
        assert!(matches!(err, RateLimitError::DailyLimit { .. }));
    }

    #[test]
    fn test_minute_error_message() {
        let err = RateLimitError::MinuteLimit {
            service: "whisper".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limit hit for whisper. Slow down.");
    }

    #[test]
    fn test_concurrent_callers_never_exceed_budget() {
        let limiter = Arc::new(RateLimiter::new(limits(100, 5)));
        let admitted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                let admitted = admitted.clone();
                thread::spawn(move || {
                    if limiter.admit("chat").is_ok() {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), 5);
    }
}
