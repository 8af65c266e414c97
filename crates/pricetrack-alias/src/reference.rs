//! Reference data for alias resolution: the canonical product list and the
//! per-store settings (numeric source ids, manual overrides).

use std::collections::HashMap;
use std::path::Path;

use pricetrack_core::Store;
use serde::Deserialize;

use crate::csv::parse_rows;
use crate::AliasError;

/// One row of the canonical cross-store product dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalProduct {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub unit_id: i64,
}

/// Alias-engine settings: the warehouse source id per store and the manual
/// override table (catalog id → canonical product id).
#[derive(Debug, Default, Deserialize)]
pub struct AliasSettings {
    #[serde(default)]
    pub source_ids: HashMap<Store, i64>,
    #[serde(default)]
    pub overrides: HashMap<String, i64>,
}

impl AliasSettings {
    /// Warehouse source id for a store; `0` when unmapped, mirroring the
    /// sentinel used by the warehouse side for "unknown source".
    #[must_use]
    pub fn source_id(&self, store: Store) -> i64 {
        self.source_ids.get(&store).copied().unwrap_or(0)
    }
}

/// Loads alias settings from YAML.
///
/// # Errors
///
/// Returns [`AliasError`] when the file is unreadable or malformed.
pub fn load_alias_settings(path: &Path) -> Result<AliasSettings, AliasError> {
    let content = std::fs::read_to_string(path).map_err(|source| AliasError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Loads the canonical product list from CSV with columns
/// `product_id,product_name,category,unit_id`.
///
/// Rows come back sorted by `product_id` so every downstream iteration is
/// deterministic.
///
/// # Errors
///
/// Returns [`AliasError`] when the file is unreadable, the header is
/// missing a required column, or a row fails to parse.
pub fn load_canonical_products(path: &Path) -> Result<Vec<CanonicalProduct>, AliasError> {
    let content = std::fs::read_to_string(path).map_err(|source| AliasError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_canonical_products(&content)
}

fn parse_canonical_products(content: &str) -> Result<Vec<CanonicalProduct>, AliasError> {
    // Spreadsheet exports often carry a BOM.
    let content = content.trim_start_matches('\u{feff}');
    let rows = parse_rows(content);

    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let column = |name: &str| -> Result<usize, AliasError> {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| AliasError::Parse {
                line: 1,
                reason: format!("missing column \"{name}\""),
            })
    };

    let id_col = column("product_id")?;
    let name_col = column("product_name")?;
    let category_col = column("category")?;
    let unit_col = column("unit_id")?;

    let width = id_col.max(name_col).max(category_col).max(unit_col);

    let mut products = Vec::with_capacity(data.len());
    for (idx, row) in data.iter().enumerate() {
        let line = idx + 2;
        if row.len() <= width {
            return Err(AliasError::Parse {
                line,
                reason: "row has too few columns".to_string(),
            });
        }

        let parse_id = |raw: &str, what: &str| -> Result<i64, AliasError> {
            raw.trim().parse::<i64>().map_err(|_| AliasError::Parse {
                line,
                reason: format!("{what} \"{raw}\" is not an integer"),
            })
        };

        products.push(CanonicalProduct {
            product_id: parse_id(&row[id_col], "product_id")?,
            product_name: row[name_col].trim().to_string(),
            category: row[category_col].trim().to_string(),
            unit_id: parse_id(&row[unit_col], "unit_id")?,
        });
    }

    products.sort_by_key(|p| p.product_id);
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}product_id,product_name,category,unit_id\n\
                          12,Chicken Boneless Breast,Meat,1\n\
                          2,Limes,Produce,3\n";

    #[test]
    fn parses_and_sorts_by_product_id() {
        let products = parse_canonical_products(SAMPLE).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_id, 2);
        assert_eq!(products[1].product_name, "Chicken Boneless Breast");
        assert_eq!(products[1].unit_id, 1);
    }

    #[test]
    fn rejects_missing_column() {
        let err = parse_canonical_products("product_id,product_name\n1,x\n").unwrap_err();
        assert!(matches!(err, AliasError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_non_numeric_id_with_line_number() {
        let bad = "product_id,product_name,category,unit_id\nabc,x,y,1\n";
        let err = parse_canonical_products(bad).unwrap_err();
        assert!(matches!(err, AliasError::Parse { line: 2, .. }));
    }

    #[test]
    fn settings_default_source_id_is_zero() {
        let settings = AliasSettings::default();
        assert_eq!(settings.source_id(Store::Metro), 0);
    }

    #[test]
    fn settings_parse_from_yaml() {
        let yaml = r#"
source_ids:
  nofrills: 4
  metro: 5
overrides:
  nf-chicken-breast: 12
"#;
        let settings: AliasSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.source_id(Store::NoFrills), 4);
        assert_eq!(settings.overrides.get("nf-chicken-breast"), Some(&12));
    }
}
