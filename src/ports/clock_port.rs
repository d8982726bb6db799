//! Time source port.
//!
//! Day rollover of the rate limiter and every record timestamp come from
//! here, so tests can drive time explicitly.

use chrono::{DateTime, NaiveDate, Utc};

pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day used for the daily counter (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
