use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Source of wall-clock time for expiry checks.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Real time from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock, second resolution. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    unix_ts: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(unix_ts: i64) -> Self {
        Self { unix_ts: Arc::new(AtomicI64::new(unix_ts)) }
    }

    pub fn set(&self, unix_ts: i64) {
        self.unix_ts.store(unix_ts, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.unix_ts.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.unix_ts.load(Ordering::SeqCst), 0)
            .unwrap_or_default()
    }
}

pub fn get_instant() -> Instant {
    Instant::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        other.advance(25);
        assert_eq!(clock.now().timestamp(), 125);
        clock.set(0);
        assert_eq!(other.now().timestamp(), 0);
    }
}
