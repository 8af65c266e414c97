//! Flat CSV dataset appender.
//!
//! One row per stored observation, on the standardized basis: the price
//! column holds the unit price and the quantity column is a constant 1, so
//! downstream analysis never has to re-normalize.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use pricetrack_core::NormalizedRecord;

use crate::DbError;

const HEADER: &str = "date,store,product,price,unit,quantity\n";

pub struct DatasetWriter {
    path: PathBuf,
}

impl DatasetWriter {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Appends one record, creating the file with its header first when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DatasetIo`] on any filesystem failure.
    pub fn append(&self, record: &NormalizedRecord) -> Result<(), DbError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let new_file = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if new_file {
            file.write_all(HEADER.as_bytes())?;
        }
        file.write_all(render_row(record).as_bytes())?;
        Ok(())
    }
}

fn render_row(record: &NormalizedRecord) -> String {
    let rounded = (record.unit_price * 100.0).round() / 100.0;
    format!(
        "{},{},{},{rounded:.2},{},1.0\n",
        record.captured_at.format("%Y-%m-%d %H:%M:%S"),
        csv_escape(&record.store.to_string()),
        csv_escape(&record.product_name),
        record.standard_unit,
    )
}

/// Quotes a field when it contains a separator, quote, or line break;
/// embedded quotes are doubled.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use pricetrack_core::{StandardUnit, StockStatus, Store};

    use super::*;

    fn record() -> NormalizedRecord {
        NormalizedRecord {
            product_id: "nf-eggs".to_string(),
            store: Store::NoFrills,
            product_name: "Large Eggs, Grade A".to_string(),
            price: 3.49,
            currency: "CAD".to_string(),
            stock: StockStatus::InStock,
            quantity: Some(12.0),
            unit: Some("un".to_string()),
            unit_price: 0.290_833,
            standard_unit: StandardUnit::Unit,
            url: "https://www.nofrills.ca/p/eggs".to_string(),
            captured_at: Utc.with_ymd_and_hms(2026, 7, 15, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn renders_rounded_unit_price_row() {
        let row = render_row(&record());
        assert_eq!(
            row,
            "2026-07-15 09:30:00,nofrills,\"Large Eggs, Grade A\",0.29,unit,1.0\n"
        );
    }

    #[test]
    fn escape_quotes_fields_with_commas_and_quotes() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn append_creates_file_with_header_once() {
        let path = std::env::temp_dir().join(format!(
            "pricetrack-dataset-test-{}.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let writer = DatasetWriter::new(&path);
        writer.append(&record()).unwrap();
        writer.append(&record()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,store,product,price,unit,quantity");
        assert_eq!(lines[1], lines[2]);
    }
}
