//! Daily cap on accepted signals.
//!
//! The counter belongs to one calendar day. Any check against a different day
//! resets it to zero first, so the count never carries across a day boundary.
//! Only accepted signals (entries actually opened) consume a slot; plain
//! evaluations do not.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCounter {
    pub count: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiter {
    threshold: u32,
    counter: DailyCounter,
}

impl RateLimiter {
    pub fn new(threshold: u32, today: NaiveDate) -> Self {
        RateLimiter {
            threshold,
            counter: DailyCounter {
                count: 0,
                date: today,
            },
        }
    }

    /// Roll the counter over if `today` differs from the stored day.
    /// Returns true when a reset happened.
    pub fn refresh(&mut self, today: NaiveDate) -> bool {
        if self.counter.date != today {
            self.counter = DailyCounter {
                count: 0,
                date: today,
            };
            true
        } else {
            false
        }
    }

    pub fn permits(&mut self, today: NaiveDate) -> bool {
        self.refresh(today);
        self.counter.count < self.threshold
    }

    /// Count an entry that was opened after `permits` allowed it.
    pub fn record_entry(&mut self, today: NaiveDate) {
        self.refresh(today);
        self.counter.count = self.counter.count.saturating_add(1);
    }

    pub fn counter(&self) -> DailyCounter {
        self.counter
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Entries still allowed on `today`, without rolling the counter over.
    pub fn remaining(&self, today: NaiveDate) -> u32 {
        if self.counter.date != today {
            return self.threshold;
        }
        self.threshold.saturating_sub(self.counter.count)
    }
}
