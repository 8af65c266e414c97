//! Price-text cleaning: raw shelf strings to a numeric value in dollars.
//!
//! Retailer pages print prices every way imaginable: `"$2.49"`, `"56¢"`,
//! multi-line flyer blobs, and sale/was pairs like `"sale: $4.00, was: $5.00"`.
//! The structured match is tried first so the sale price (the first currency
//! token) wins over any later reference price.

use regex::Regex;

use crate::error::PriceParseError;

/// Parses an arbitrary short price string into a value in dollars.
///
/// Matching order:
/// 1. first `$`-prefixed or cents-suffixed numeric token,
/// 2. label-stripped remainder parsed as a float (cents scale applied),
/// 3. any decimal-looking substring.
///
/// # Errors
///
/// Returns [`PriceParseError`] when no numeric value can be recovered.
/// Callers treat this as an extraction failure for the one item, never as a
/// fatal error.
pub fn clean_price(text: &str) -> Result<f64, PriceParseError> {
    let err = || PriceParseError {
        text: text.to_string(),
    };

    let mut clean = text.trim().to_string();
    if clean.is_empty() {
        return Err(err());
    }

    // Cents marker: '¢' anywhere, or a trailing standalone 'c'.
    let is_cents = clean.contains('¢') || (clean.ends_with('c') && !clean.ends_with("cc"));

    clean = clean.replace(['\n', '\r'], " ");

    // First currency token wins: "$4.00" in "sale: $4.00, was: $5.00", or
    // "56¢" in a flyer blob.
    let structured =
        Regex::new(r"(\d+(?:\.\d+)?)\s*[¢c]|\$\s*(\d+(?:\.\d+)?)").expect("valid price regex");
    if let Some(caps) = structured.captures(&clean) {
        if let Some(dollars) = caps.get(2) {
            if let Ok(v) = dollars.as_str().parse::<f64>() {
                return Ok(v);
            }
        }
        if let Some(cents) = caps.get(1) {
            if let Ok(v) = cents.as_str().parse::<f64>() {
                return Ok(v / 100.0);
            }
        }
    }

    // Fallback: strip a leading label ("Price: ") and currency punctuation,
    // then parse what is left.
    if is_cents {
        clean = clean.replace(['¢', 'c', 'C'], "");
    }
    let label = Regex::new(r"^[A-Za-z\s:]+").expect("valid label regex");
    clean = label.replace(&clean, "").into_owned();
    clean = clean.replace(['$', ','], "");

    if let Ok(v) = clean.trim().parse::<f64>() {
        return Ok(if is_cents { v / 100.0 } else { v });
    }

    // Last resort: any decimal substring.
    let decimal = Regex::new(r"\d+\.\d+").expect("valid decimal regex");
    if let Some(m) = decimal.find(&clean) {
        if let Ok(v) = m.as_str().parse::<f64>() {
            return Ok(v);
        }
    }

    Err(err())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dollar_price() {
        assert_eq!(clean_price("$2.49").unwrap(), 2.49);
    }

    #[test]
    fn dollar_price_with_space() {
        assert_eq!(clean_price("$ 12.99").unwrap(), 12.99);
    }

    #[test]
    fn cents_symbol_divides_by_hundred() {
        assert_eq!(clean_price("56¢").unwrap(), 0.56);
    }

    #[test]
    fn trailing_c_divides_by_hundred() {
        assert_eq!(clean_price("89c").unwrap(), 0.89);
    }

    #[test]
    fn sale_price_preferred_over_reference_price() {
        assert_eq!(clean_price("sale: $4.00, was: $5.00").unwrap(), 4.00);
    }

    #[test]
    fn multiline_flyer_blob() {
        assert_eq!(clean_price("SALE\n$3.99\nwas $4.99").unwrap(), 3.99);
    }

    #[test]
    fn labeled_bare_number_falls_back() {
        assert_eq!(clean_price("Price: 7.49").unwrap(), 7.49);
    }

    #[test]
    fn comma_thousands_stripped_in_fallback() {
        assert_eq!(clean_price("Price: 1,299.00").unwrap(), 1299.00);
    }

    #[test]
    fn decimal_substring_as_last_resort() {
        assert_eq!(clean_price("2 for 5.98 deal").unwrap(), 5.98);
    }

    #[test]
    fn unrecognized_text_errors() {
        let err = clean_price("call for price").unwrap_err();
        assert!(err.text.contains("call for price"));
    }

    #[test]
    fn empty_string_errors() {
        assert!(clean_price("   ").is_err());
    }

    #[test]
    fn whole_dollar_amount_without_decimals() {
        assert_eq!(clean_price("$5").unwrap(), 5.0);
    }
}
