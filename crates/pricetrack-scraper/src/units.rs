//! Quantity/unit parsing and conversion to canonical per-kg / per-litre /
//! per-unit pricing.

use pricetrack_core::StandardUnit;
use regex::Regex;

/// Kilograms per pound.
pub const KG_PER_LB: f64 = 0.453_592;
/// Kilograms per ounce.
pub const KG_PER_OZ: f64 = 0.028_349_5;

/// Extracts a quantity and unit token from package-size text.
///
/// Matches the first `<number><unit>` pair, e.g. `"907 g"` → `(907.0, "g")`,
/// `"2 x 1.5 lb"` → `(2.0, ...)` is avoided because `x` is not a unit token;
/// the match lands on `1.5 lb`. Unknown units yield `None`.
#[must_use]
pub fn parse_quantity(text: &str) -> Option<(f64, String)> {
    if text.is_empty() {
        return None;
    }

    let pattern = Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*(kg|g|lb|l|ml|oz|units|count|pk|ea|bunch|roll|un)",
    )
    .expect("valid quantity regex");

    let caps = pattern.captures(text)?;
    let quantity = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    Some((quantity, unit))
}

/// Parses an explicit unit-price string such as `"65¢/100g"`, `"$2.49/lb"`,
/// or `"$0.99 / 1ea"` into `(value, quantity, unit)`.
///
/// Quantity defaults to `1` when omitted. The value is divided by 100 when
/// the text carries a cents marker and no `$` co-occurs.
#[must_use]
pub fn parse_unit_price(text: &str) -> Option<(f64, f64, String)> {
    if text.is_empty() {
        return None;
    }

    let pattern = Regex::new(
        r"(?i)(?:\$|\s)?(\d+(?:\.\d+)?)\s*(?:¢|c|\$)?\s*/\s*(\d+(?:\.\d+)?)?\s*(kg|g|lb|oz|l|ml|unit|ea|bunch|un)",
    )
    .expect("valid unit-price regex");

    let caps = pattern.captures(text)?;
    let mut value = caps.get(1)?.as_str().parse::<f64>().ok()?;

    let lower = text.to_lowercase();
    if (text.contains('¢') || lower.contains('c')) && !text.contains('$') {
        value /= 100.0;
    }

    let quantity = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(1.0);
    let unit = caps.get(3)?.as_str().to_lowercase();
    Some((value, quantity, unit))
}

/// Converts a (price, quantity, unit) triple to a unit price on a canonical
/// basis: kilograms for weight, litres for volume, single units for
/// everything count-like.
///
/// Any absent or non-positive input yields `(0.0, Unknown)`: a degraded
/// result the caller stores without a per-unit comparison, not an error.
#[must_use]
pub fn to_standard_unit(
    price: f64,
    quantity: Option<f64>,
    unit: Option<&str>,
) -> (f64, StandardUnit) {
    let (Some(quantity), Some(unit)) = (quantity, unit) else {
        return (0.0, StandardUnit::Unknown);
    };
    if !(price > 0.0) || !(quantity > 0.0) || unit.is_empty() {
        return (0.0, StandardUnit::Unknown);
    }

    match unit {
        "g" => (price / (quantity / 1000.0), StandardUnit::Kg),
        "kg" => (price / quantity, StandardUnit::Kg),
        "lb" => (price / (quantity * KG_PER_LB), StandardUnit::Kg),
        "oz" => (price / (quantity * KG_PER_OZ), StandardUnit::Kg),
        "ml" => (price / (quantity / 1000.0), StandardUnit::Litre),
        "l" => (price / quantity, StandardUnit::Litre),
        _ => (price / quantity, StandardUnit::Unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn parse_quantity_grams() {
        assert_eq!(parse_quantity("907 g"), Some((907.0, "g".to_string())));
    }

    #[test]
    fn parse_quantity_decimal_pounds() {
        assert_eq!(parse_quantity("1.5 lb"), Some((1.5, "lb".to_string())));
    }

    #[test]
    fn parse_quantity_is_case_insensitive() {
        assert_eq!(parse_quantity("4 KG"), Some((4.0, "kg".to_string())));
    }

    #[test]
    fn parse_quantity_millilitres_not_litres() {
        assert_eq!(parse_quantity("250 ml"), Some((250.0, "ml".to_string())));
    }

    #[test]
    fn parse_quantity_count_like() {
        assert_eq!(parse_quantity("1 bunch"), Some((1.0, "bunch".to_string())));
        assert_eq!(parse_quantity("12 un."), Some((12.0, "un".to_string())));
    }

    #[test]
    fn parse_quantity_rejects_unknown_text() {
        assert_eq!(parse_quantity("family size"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn parse_unit_price_cents_per_hundred_grams() {
        let (v, q, u) = parse_unit_price("65¢/100g").unwrap();
        assert!(close(v, 0.65));
        assert!(close(q, 100.0));
        assert_eq!(u, "g");
    }

    #[test]
    fn parse_unit_price_dollars_per_pound() {
        let (v, q, u) = parse_unit_price("$2.49/lb").unwrap();
        assert!(close(v, 2.49));
        assert!(close(q, 1.0));
        assert_eq!(u, "lb");
    }

    #[test]
    fn parse_unit_price_explicit_quantity() {
        let (v, q, u) = parse_unit_price("$0.99 / 1ea").unwrap();
        assert!(close(v, 0.99));
        assert!(close(q, 1.0));
        assert_eq!(u, "ea");
    }

    #[test]
    fn parse_unit_price_quantity_defaults_to_one() {
        let (_, q, _) = parse_unit_price("$1.99 /un.").unwrap();
        assert!(close(q, 1.0));
    }

    #[test]
    fn parse_unit_price_none_for_plain_weight() {
        assert_eq!(parse_unit_price("907 g"), None);
    }

    #[test]
    fn standard_unit_grams_to_kg() {
        let (unit_price, unit) = to_standard_unit(4.00, Some(907.0), Some("g"));
        assert!(close(unit_price, 4.00 / 0.907));
        assert_eq!(unit, StandardUnit::Kg);
        assert!((unit_price - 4.41).abs() < 0.01);
    }

    #[test]
    fn standard_unit_pounds_to_kg() {
        let (unit_price, unit) = to_standard_unit(2.49, Some(1.0), Some("lb"));
        assert!(close(unit_price, 2.49 / KG_PER_LB));
        assert_eq!(unit, StandardUnit::Kg);
    }

    #[test]
    fn standard_unit_millilitres_to_litre() {
        let (unit_price, unit) = to_standard_unit(3.00, Some(750.0), Some("ml"));
        assert!(close(unit_price, 4.0));
        assert_eq!(unit, StandardUnit::Litre);
    }

    #[test]
    fn standard_unit_count_basis() {
        let (unit_price, unit) = to_standard_unit(5.00, Some(4.0), Some("ea"));
        assert!(close(unit_price, 1.25));
        assert_eq!(unit, StandardUnit::Unit);
    }

    #[test]
    fn standard_unit_scale_consistency_g_vs_kg() {
        let (per_kg_from_g, _) = to_standard_unit(10.0, Some(500.0), Some("g"));
        let (per_kg_from_kg, _) = to_standard_unit(10.0, Some(0.5), Some("kg"));
        assert!(close(per_kg_from_g, per_kg_from_kg));
    }

    #[test]
    fn standard_unit_idempotent_on_standard_input() {
        let (first, unit) = to_standard_unit(6.50, Some(1.0), Some("kg"));
        let (second, unit2) = to_standard_unit(first, Some(1.0), Some("kg"));
        assert!(close(first, second));
        assert_eq!(unit, unit2);
    }

    #[test]
    fn standard_unit_degrades_on_missing_inputs() {
        assert_eq!(
            to_standard_unit(4.0, None, Some("g")),
            (0.0, StandardUnit::Unknown)
        );
        assert_eq!(
            to_standard_unit(4.0, Some(1.0), None),
            (0.0, StandardUnit::Unknown)
        );
        assert_eq!(
            to_standard_unit(0.0, Some(1.0), Some("kg")),
            (0.0, StandardUnit::Unknown)
        );
        assert_eq!(
            to_standard_unit(4.0, Some(0.0), Some("kg")),
            (0.0, StandardUnit::Unknown)
        );
    }
}
