//! Food Basics product-detail pages. Shares the storefront platform with
//! Metro, but the unit price moves around more between page revisions.

use scraper::Html;
use tracing::warn;

use crate::clean::clean_price;
use crate::types::ExtractedItem;

use super::metro::find_unit_price_fragment;
use super::{first_spaced_text, first_text, StoreAdapter};

pub struct FoodBasicsAdapter;

impl StoreAdapter for FoodBasicsAdapter {
    fn parse(&self, html: &str) -> Vec<ExtractedItem> {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        let name = first_text(root, &["h1.pi--title"]);
        let weight_text = first_text(root, &["div.pi--weight"]);
        let price_text = first_text(root, &["span.price-update"]);

        let price = match clean_price(&price_text) {
            Ok(price) => price,
            Err(_) => {
                warn!(store = "foodbasics", name = %name, "essential price data missing");
                return Vec::new();
            }
        };

        let mut unit_text = first_spaced_text(root, &[".pricing__secondary-price"]);
        if unit_text.is_empty() {
            let full_text = first_spaced_text(
                root,
                &[
                    "div.pi--price",
                    "div.pi--prices",
                    ".product-details__product-info__price",
                ],
            );
            if full_text.contains('/') {
                if let Some(found) = find_unit_price_fragment(&full_text) {
                    unit_text = found;
                }
            }
            // Still nothing structured: keep the container text minus the
            // main price, so the normalizer gets a chance at it.
            if unit_text.is_empty() && !full_text.is_empty() {
                unit_text = full_text.replace(&price_text, "").trim().to_string();
            }
        }

        let unit_price_text = format!("{weight_text}, {unit_text}")
            .trim_matches([',', ' '])
            .to_string();

        match ExtractedItem::success(name, price, weight_text, unit_price_text) {
            Some(item) => vec![item],
            None => {
                warn!(store = "foodbasics", "essential name data missing");
                Vec::new()
            }
        }
    }
}
