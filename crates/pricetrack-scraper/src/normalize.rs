//! Structural conversion from a raw [`ExtractedItem`] to a
//! [`NormalizedRecord`] on a canonical pricing basis.

use chrono::{DateTime, Utc};
use pricetrack_core::{CatalogProduct, NormalizedRecord};

use crate::types::ExtractedItem;
use crate::units::{parse_quantity, parse_unit_price, to_standard_unit};

/// Normalizes a successful extraction against its catalog entry.
///
/// The explicit unit-price string is preferred when parseable (it is already
/// per-unit and published by the retailer); deriving a per-unit price from
/// total price ÷ package weight is the fallback. When the catalog entry
/// declares a `pack_size`, both price and unit price are divided by it so an
/// outer multi-pack is stored on a single-item basis.
///
/// Returns `None` when the item carries no price; callers treat that as a
/// parse failure for the product, not a panic.
#[must_use]
pub fn normalize_record(
    item: &ExtractedItem,
    product: &CatalogProduct,
    captured_at: DateTime<Utc>,
) -> Option<NormalizedRecord> {
    let mut price = item.price?;

    let (mut unit_price, standard_unit, quantity, unit) =
        match parse_unit_price(&item.unit_price_text) {
            Some((value, qty, unit)) => {
                let (unit_price, standard) = to_standard_unit(value, Some(qty), Some(&unit));
                (unit_price, standard, Some(qty), Some(unit))
            }
            None => {
                let parsed = parse_quantity(&item.raw_weight);
                let (qty, unit) = match parsed {
                    Some((q, u)) => (Some(q), Some(u)),
                    None => (None, None),
                };
                let (unit_price, standard) = to_standard_unit(price, qty, unit.as_deref());
                (unit_price, standard, qty, unit)
            }
        };

    if let Some(pack_size) = product.pack_size {
        price /= pack_size;
        unit_price /= pack_size;
    }

    Some(NormalizedRecord {
        product_id: product.id.clone(),
        store: product.store,
        product_name: product.name.clone(),
        price,
        currency: item.currency.clone(),
        stock: item.stock,
        quantity,
        unit,
        unit_price,
        standard_unit,
        url: item.url.clone().unwrap_or_else(|| product.url.clone()),
        captured_at,
    })
}

#[cfg(test)]
mod tests {
    use pricetrack_core::{StandardUnit, Store};

    use super::*;

    fn catalog_product(pack_size: Option<f64>) -> CatalogProduct {
        CatalogProduct {
            id: "nf-chicken-breast".to_string(),
            name: "Chicken Breast".to_string(),
            store: Store::NoFrills,
            url: "https://www.nofrills.ca/p/chicken".to_string(),
            active: true,
            pack_size,
        }
    }

    fn item(price: f64, raw_weight: &str, unit_price_text: &str) -> ExtractedItem {
        ExtractedItem::success(
            "Chicken Breast".to_string(),
            price,
            raw_weight.to_string(),
            unit_price_text.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn prefers_explicit_unit_price_string() {
        // Package is 907 g for $12.00, but the shelf tag publishes $2.49/lb.
        let record = normalize_record(
            &item(12.00, "907 g", "$2.49/lb"),
            &catalog_product(None),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.standard_unit, StandardUnit::Kg);
        assert!((record.unit_price - 2.49 / 0.453_592).abs() < 1e-6);
        assert_eq!(record.unit.as_deref(), Some("lb"));
        assert_eq!(record.quantity, Some(1.0));
    }

    #[test]
    fn falls_back_to_package_weight() {
        let record = normalize_record(
            &item(4.00, "907 g", "no unit price here"),
            &catalog_product(None),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.standard_unit, StandardUnit::Kg);
        assert!((record.unit_price - 4.41).abs() < 0.01);
        assert_eq!(record.quantity, Some(907.0));
    }

    #[test]
    fn degrades_when_nothing_is_parseable() {
        let record = normalize_record(
            &item(4.00, "family size", ""),
            &catalog_product(None),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(record.standard_unit, StandardUnit::Unknown);
        assert_eq!(record.unit_price, 0.0);
        assert_eq!(record.price, 4.00);
    }

    #[test]
    fn pack_size_divides_price_and_unit_price() {
        let without = normalize_record(
            &item(9.00, "3 un", ""),
            &catalog_product(None),
            Utc::now(),
        )
        .unwrap();
        let with = normalize_record(
            &item(9.00, "3 un", ""),
            &catalog_product(Some(3.0)),
            Utc::now(),
        )
        .unwrap();
        assert!((with.price - without.price / 3.0).abs() < 1e-9);
        assert!((with.unit_price - without.unit_price / 3.0).abs() < 1e-9);
    }

    #[test]
    fn uses_item_url_over_catalog_url_when_present() {
        let mut extracted = item(2.00, "", "");
        extracted.url = Some("https://www.nofrills.ca/p/other".to_string());
        let record =
            normalize_record(&extracted, &catalog_product(None), Utc::now()).unwrap();
        assert_eq!(record.url, "https://www.nofrills.ca/p/other");
    }

    #[test]
    fn none_when_item_has_no_price() {
        let blocked = ExtractedItem::blocked();
        assert!(normalize_record(&blocked, &catalog_product(None), Utc::now()).is_none());
    }
}
