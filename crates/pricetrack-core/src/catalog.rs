use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Retailer identifier. Each variant has exactly one adapter in the scraper
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    NoFrills,
    FoodBasics,
    Metro,
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Store::NoFrills => write!(f, "nofrills"),
            Store::FoodBasics => write!(f, "foodbasics"),
            Store::Metro => write!(f, "metro"),
        }
    }
}

impl FromStr for Store {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nofrills" => Ok(Store::NoFrills),
            "foodbasics" => Ok(Store::FoodBasics),
            "metro" => Ok(Store::Metro),
            _ => Err(()),
        }
    }
}

/// One tracked product as configured in `config/catalog.yaml`.
///
/// Immutable during a scrape pass; the orchestrator only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Stable store-native key, e.g. `"nf-chicken-breast"`.
    pub id: String,
    pub name: String,
    pub store: Store,
    pub url: String,
    /// Paused products stay in the file but are skipped by scan cycles.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Count of identical inner units in one scraped package. When set,
    /// price and unit price are divided by it so multi-pack listings are
    /// stored on a single-item basis.
    #[serde(default)]
    pub pack_size: Option<f64>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<CatalogProduct>,
}

impl CatalogFile {
    /// Returns the products eligible for a scan cycle: active, and belonging
    /// to one of the enabled stores.
    #[must_use]
    pub fn scannable(&self, enabled_stores: &[Store]) -> Vec<CatalogProduct> {
        self.products
            .iter()
            .filter(|p| p.active && enabled_stores.contains(&p.store))
            .cloned()
            .collect()
    }
}

/// Load and validate the product catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (duplicate/empty ids, non-positive pack sizes).
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for product in &catalog.products {
        if product.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "product \"{}\" has an empty id",
                product.name
            )));
        }
        if product.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "product \"{}\" has an empty name",
                product.id
            )));
        }
        if !seen_ids.insert(product.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product id: \"{}\"",
                product.id
            )));
        }
        if let Some(pack) = product.pack_size {
            if !(pack > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "product \"{}\" has non-positive pack_size {pack}",
                    product.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, store: Store, active: bool) -> CatalogProduct {
        CatalogProduct {
            id: id.to_string(),
            name: format!("Product {id}"),
            store,
            url: format!("https://example.com/{id}"),
            active,
            pack_size: None,
        }
    }

    #[test]
    fn store_round_trips_through_display_and_from_str() {
        for store in [Store::NoFrills, Store::FoodBasics, Store::Metro] {
            assert_eq!(store.to_string().parse::<Store>().unwrap(), store);
        }
    }

    #[test]
    fn catalog_yaml_parses_with_defaults() {
        let yaml = r#"
products:
  - id: nf-eggs
    name: Extra Large Eggs
    store: nofrills
    url: https://www.nofrills.ca/p/eggs
  - id: me-milk
    name: Milk 3.25
    store: metro
    url: https://www.metro.ca/p/milk
    active: false
    pack_size: 3
"#;
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(catalog.products.len(), 2);
        assert!(catalog.products[0].active);
        assert!(catalog.products[0].pack_size.is_none());
        assert!(!catalog.products[1].active);
        assert_eq!(catalog.products[1].pack_size, Some(3.0));
        assert_eq!(catalog.products[1].store, Store::Metro);
    }

    #[test]
    fn scannable_filters_inactive_and_disabled_stores() {
        let catalog = CatalogFile {
            products: vec![
                product("a", Store::NoFrills, true),
                product("b", Store::NoFrills, false),
                product("c", Store::Metro, true),
            ],
        };
        let eligible = catalog.scannable(&[Store::NoFrills]);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, "a");
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let catalog = CatalogFile {
            products: vec![
                product("dup", Store::Metro, true),
                product("dup", Store::Metro, true),
            ],
        };
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("dup")));
    }

    #[test]
    fn validate_rejects_zero_pack_size() {
        let mut bad = product("a", Store::Metro, true);
        bad.pack_size = Some(0.0);
        let catalog = CatalogFile { products: vec![bad] };
        assert!(validate_catalog(&catalog).is_err());
    }
}
