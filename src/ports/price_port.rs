//! Price source port.
//!
//! Where prices come from (files, feeds, caches) is the adapter's business;
//! the engine only ever sees the resulting series.

use crate::domain::error::StoError;

pub trait PricePort {
    /// Chronological prices, oldest first.
    fn load_prices(&self) -> Result<Vec<f64>, StoError>;
}
