//! Metro product-detail pages.

use regex::Regex;
use scraper::Html;
use tracing::warn;

use crate::clean::clean_price;
use crate::types::ExtractedItem;

use super::{first_spaced_text, first_text, StoreAdapter};

pub struct MetroAdapter;

impl StoreAdapter for MetroAdapter {
    fn parse(&self, html: &str) -> Vec<ExtractedItem> {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        let name = first_text(root, &["h1.pi--title", "h1.product-details__title"]);
        let weight_text = first_text(root, &["div.pi--weight"]);
        let price_text = first_text(root, &["span.price-update"]);

        let price = match clean_price(&price_text) {
            Ok(price) => price,
            Err(_) => {
                warn!(store = "metro", name = %name, "essential price data missing");
                return Vec::new();
            }
        };

        let mut unit_text = first_text(root, &[".pi--unit-price", ".pricing__secondary-price"]);
        if unit_text.is_empty() {
            // The unit price sometimes only appears inside the combined
            // price container, mixed with the main price.
            let full_text = first_spaced_text(
                root,
                &["div.pi--price", ".product-details__product-info__price"],
            );
            if let Some(found) = find_unit_price_fragment(&full_text) {
                unit_text = found;
            }
        }

        let unit_price_text = format!("{weight_text}, {unit_text}")
            .trim_matches([',', ' '])
            .to_string();

        match ExtractedItem::success(name, price, weight_text, unit_price_text) {
            Some(item) => vec![item],
            None => {
                warn!(store = "metro", "essential name data missing");
                Vec::new()
            }
        }
    }
}

/// Scans free text for a `$<n>/<unit>` fragment.
pub(super) fn find_unit_price_fragment(text: &str) -> Option<String> {
    let pattern = Regex::new(r"(?i)\$?[\d,.]+\s*/\s*(?:kg|lb|l|ml|unit|ea|un)")
        .expect("valid unit-price fragment regex");
    pattern.find(text).map(|m| m.as_str().to_string())
}
