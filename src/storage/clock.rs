//! Clocks and id generation
//!
//! Record ids are derived from the creation time in milliseconds, bumped
//! past the previous id when two records land in the same millisecond (or
//! the clock steps backwards). Ids therefore always follow insertion order.

use chrono::{Duration, Local, NaiveDateTime};
use std::sync::Mutex;

/// Source of "now" in local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the host's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for tests and scripted demos
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Strictly increasing id source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for something created at `now`
    pub fn next_at(&mut self, now: NaiveDateTime) -> i64 {
        let candidate = now.and_utc().timestamp_millis();
        let id = candidate.max(self.last + 1);
        self.last = id;
        id
    }

    /// Accept an externally chosen id if it keeps the order strictly increasing
    pub fn claim(&mut self, id: i64) -> bool {
        if id <= self.last {
            return false;
        }
        self.last = id;
        true
    }

    /// The most recently issued id (0 before the first)
    pub fn last(&self) -> i64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_ids_increase_under_frozen_clock() {
        let mut ids = IdGenerator::new();
        let a = ids.next_at(noon());
        let b = ids.next_at(noon());
        let c = ids.next_at(noon());
        assert!(a < b && b < c);
        assert_eq!(b, a + 1);
    }

    #[test]
    fn test_ids_survive_clock_going_backwards() {
        let mut ids = IdGenerator::new();
        let a = ids.next_at(noon());
        let b = ids.next_at(noon() - Duration::hours(1));
        assert!(b > a);
    }

    #[test]
    fn test_claim() {
        let mut ids = IdGenerator::new();
        assert!(ids.claim(10));
        assert!(!ids.claim(10));
        assert!(!ids.claim(3));
        assert_eq!(ids.last(), 10);
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(ids.next_at(epoch), 11);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(noon());
        clock.advance(Duration::minutes(30));
        assert_eq!(clock.now(), noon() + Duration::minutes(30));
        clock.set(noon());
        assert_eq!(clock.now(), noon());
    }
}
