//! Price series validation.
//!
//! The engine consumes a chronological sequence of prices. Every entry must be
//! a finite, strictly positive number; anything else is rejected before any
//! indicator is computed.

use super::error::StoError;

/// Check a raw price slice, returning the first offending entry as an error.
pub fn validate_prices(prices: &[f64]) -> Result<(), StoError> {
    if prices.is_empty() {
        return Err(StoError::invalid_input(0, "price series is empty"));
    }
    for (index, &price) in prices.iter().enumerate() {
        if !price.is_finite() {
            return Err(StoError::invalid_input(index, format!("{price} is not a finite number")));
        }
        if price <= 0.0 {
            return Err(StoError::invalid_input(index, format!("{price} is not positive")));
        }
    }
    Ok(())
}

/// Parse textual price entries (e.g. cells of a price file).
///
/// Blank or non-numeric entries are rejected, never skipped or coerced.
pub fn parse_prices<S: AsRef<str>>(entries: &[S]) -> Result<Vec<f64>, StoError> {
    let mut prices = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let raw = entry.as_ref().trim();
        let price: f64 = raw
            .parse()
            .map_err(|_| StoError::invalid_input(index, format!("'{raw}' is not a number")))?;
        prices.push(price);
    }
    validate_prices(&prices)?;
    Ok(prices)
}

/// Last price of a series, the price entries and exits execute at.
pub fn last_price(prices: &[f64]) -> Option<f64> {
    prices.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_prices() {
        assert!(validate_prices(&[100.0, 100.5, 99.25]).is_ok());
    }

    #[test]
    fn rejects_empty_series() {
        let err = validate_prices(&[]).unwrap_err();
        assert!(matches!(err, StoError::InvalidInput { index: 0, .. }));
    }

    #[test]
    fn rejects_nan_with_index() {
        let err = validate_prices(&[100.0, f64::NAN, 101.0]).unwrap_err();
        assert!(matches!(err, StoError::InvalidInput { index: 1, .. }));
    }

    #[test]
    fn rejects_infinite() {
        let err = validate_prices(&[100.0, 101.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, StoError::InvalidInput { index: 2, .. }));
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(validate_prices(&[0.0]).is_err());
        let err = validate_prices(&[10.0, -1.0]).unwrap_err();
        assert!(matches!(err, StoError::InvalidInput { index: 1, .. }));
    }

    #[test]
    fn parse_trims_whitespace() {
        let prices = parse_prices(&[" 87000", "87200 ", "87150.5"]).unwrap();
        assert_eq!(prices, vec![87000.0, 87200.0, 87150.5]);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = parse_prices(&["100", "abc", "101"]).unwrap_err();
        match err {
            StoError::InvalidInput { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_blank_entry() {
        let err = parse_prices(&["100", "  "]).unwrap_err();
        assert!(matches!(err, StoError::InvalidInput { index: 1, .. }));
    }

    #[test]
    fn last_price_of_series() {
        assert_eq!(last_price(&[1.0, 2.0, 3.0]), Some(3.0));
        assert_eq!(last_price(&[]), None);
    }
}
