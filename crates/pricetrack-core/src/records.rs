use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Store;

/// Canonical pricing basis used to make cross-store prices comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardUnit {
    Kg,
    #[serde(rename = "L")]
    Litre,
    Unit,
    /// Degraded result: quantity or unit could not be determined. The record
    /// is still stored; only the per-unit comparison is unavailable.
    Unknown,
}

impl std::fmt::Display for StandardUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandardUnit::Kg => write!(f, "kg"),
            StandardUnit::Litre => write!(f, "L"),
            StandardUnit::Unit => write!(f, "unit"),
            StandardUnit::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for StandardUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(StandardUnit::Kg),
            "L" => Ok(StandardUnit::Litre),
            "unit" => Ok(StandardUnit::Unit),
            "unknown" => Ok(StandardUnit::Unknown),
            _ => Err(()),
        }
    }
}

/// Stock status as reported by a retailer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    Unknown,
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "in_stock"),
            StockStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One fully-normalized price observation, ready for storage.
///
/// `unit_price` is always expressed per one `standard_unit`; when the
/// standard unit is [`StandardUnit::Unknown`] the unit price is `0.0` and
/// must be treated as unavailable, not as free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub product_id: String,
    pub store: Store,
    pub product_name: String,
    /// Shelf price in major currency units, after pack-size adjustment.
    pub price: f64,
    pub currency: String,
    pub stock: StockStatus,
    /// Package quantity as parsed from the page, in `unit`.
    pub quantity: Option<f64>,
    /// Source unit token the quantity was parsed with (e.g. `"g"`, `"lb"`).
    pub unit: Option<String>,
    pub unit_price: f64,
    pub standard_unit: StandardUnit,
    pub url: String,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_unit_display_round_trips() {
        for unit in [
            StandardUnit::Kg,
            StandardUnit::Litre,
            StandardUnit::Unit,
            StandardUnit::Unknown,
        ] {
            assert_eq!(unit.to_string().parse::<StandardUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn standard_unit_serde_uses_capital_l_for_litre() {
        let json = serde_json::to_string(&StandardUnit::Litre).unwrap();
        assert_eq!(json, "\"L\"");
    }

    #[test]
    fn stock_status_serde_is_snake_case() {
        let json = serde_json::to_string(&StockStatus::InStock).unwrap();
        assert_eq!(json, "\"in_stock\"");
    }
}
