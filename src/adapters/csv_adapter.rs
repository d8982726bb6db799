//! CSV price file adapter.
//!
//! Reads one price per row. The price column is the one headed `price` or
//! `close` (case-insensitive), otherwise the last column. A file whose first
//! row already holds a number in that column is treated as headerless.

use crate::domain::error::StoError;
use crate::domain::price::parse_prices;
use crate::ports::price_port::PricePort;
use std::path::{Path, PathBuf};

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn price_column(header: &csv::StringRecord) -> Option<usize> {
        header
            .iter()
            .position(|name| {
                let name = name.trim().to_ascii_lowercase();
                name == "price" || name == "close"
            })
            .or_else(|| header.len().checked_sub(1))
    }
}

impl PricePort for CsvPriceAdapter {
    fn load_prices(&self) -> Result<Vec<f64>, StoError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| StoError::PriceFile {
                reason: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        let mut records = rdr.records();
        let first = match records.next() {
            Some(record) => record.map_err(|e| StoError::PriceFile {
                reason: format!("CSV parse error: {}", e),
            })?,
            None => return parse_prices::<&str>(&[]),
        };

        let column = Self::price_column(&first).ok_or_else(|| StoError::PriceFile {
            reason: format!("{} has no columns", self.path.display()),
        })?;

        let mut cells = Vec::new();
        match first.get(column) {
            Some(cell) if cell.parse::<f64>().is_ok() => cells.push(cell.to_string()),
            _ => {}
        }

        for result in records {
            let record = result.map_err(|e| StoError::PriceFile {
                reason: format!("CSV parse error: {}", e),
            })?;
            cells.push(record.get(column).unwrap_or_default().to_string());
        }

        parse_prices(&cells)
    }
}
