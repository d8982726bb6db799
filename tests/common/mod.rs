#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Write;
use std::sync::{Arc, Mutex};
use sto::domain::engine::{Engine, EngineConfig};
use sto::ports::clock_port::ClockPort;

/// Clock driven by the test. Clones share the same instant.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Self {
        Self {
            now: Arc::new(Mutex::new(
                Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap(),
            )),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn engine_with(config: EngineConfig) -> (Engine<ManualClock>, ManualClock) {
    let clock = ManualClock::at(2024, 3, 1, 9, 0);
    (Engine::new(config, clock.clone()), clock)
}

/// `count` prices climbing by `step` from `start`.
pub fn rising(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// `count` prices falling by `step` from `start`.
pub fn falling(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start - step * i as f64).collect()
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

pub fn price_csv(prices: &[f64]) -> String {
    let mut out = String::from("date,close\n");
    for (i, p) in prices.iter().enumerate() {
        out.push_str(&format!("2024-01-{:02},{}\n", (i % 28) + 1, p));
    }
    out
}
