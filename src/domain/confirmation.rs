//! Signal confirmation over a bounded window of recent raw signals.
//!
//! `SignalWindow` is a fixed-capacity ring that evicts its oldest entry on
//! overflow. `ConfirmationFilter` pushes every raw signal into the window and
//! reports a signal as confirmed once it occurs at least `threshold` times in
//! the window. HOLD never confirms.

use std::collections::VecDeque;

use super::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalWindow {
    capacity: usize,
    signals: VecDeque<Signal>,
}

impl SignalWindow {
    pub fn new(capacity: usize) -> Self {
        SignalWindow {
            capacity,
            signals: VecDeque::new(),
        }
    }

    /// Append a signal, evicting the oldest one when full.
    pub fn push(&mut self, signal: Signal) -> Option<Signal> {
        if self.capacity == 0 {
            return Some(signal);
        }
        let evicted = if self.signals.len() == self.capacity {
            self.signals.pop_front()
        } else {
            None
        };
        self.signals.push_back(signal);
        evicted
    }

    pub fn count(&self, signal: Signal) -> usize {
        self.signals.iter().filter(|&&s| s == signal).count()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationFilter {
    window: SignalWindow,
    threshold: usize,
}

impl ConfirmationFilter {
    pub fn new(capacity: usize, threshold: usize) -> Self {
        ConfirmationFilter {
            window: SignalWindow::new(capacity),
            threshold,
        }
    }

    pub fn observe(&mut self, signal: Signal) -> bool {
        self.window.push(signal);
        signal.is_actionable() && self.window.count(signal) >= self.threshold
    }

    pub fn history(&self) -> &SignalWindow {
        &self.window
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
