//! Per-retailer structural extraction.
//!
//! One adapter per site, all behind [`StoreAdapter`]; selection is a plain
//! mapping from the [`Store`] identifier, not inheritance. Adapters never
//! raise past their boundary: a malformed card is skipped with a logged
//! warning, a structurally unrecognizable page yields an empty list.

mod foodbasics;
mod metro;
mod nofrills;

use pricetrack_core::Store;
use scraper::{ElementRef, Selector};

use crate::types::ExtractedItem;

pub use foodbasics::FoodBasicsAdapter;
pub use metro::MetroAdapter;
pub use nofrills::NoFrillsAdapter;

/// Turns rendered HTML into zero or more extracted items.
pub trait StoreAdapter: Sync {
    fn parse(&self, html: &str) -> Vec<ExtractedItem>;
}

/// Returns the adapter for a retailer.
#[must_use]
pub fn adapter_for(store: Store) -> &'static dyn StoreAdapter {
    match store {
        Store::NoFrills => &NoFrillsAdapter,
        Store::FoodBasics => &FoodBasicsAdapter,
        Store::Metro => &MetroAdapter,
    }
}

pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Concatenated text of an element, trimmed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Element text with fragments joined by single spaces, for containers that
/// mix several inline nodes (price, unit price, badges).
pub(crate) fn spaced_text_of(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first selector in `selectors` that matches under `scope`,
/// or an empty string when none do.
pub(crate) fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> String {
    for css in selectors {
        if let Some(el) = scope.select(&sel(css)).next() {
            let text = text_of(el);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Spaced-text variant of [`first_text`].
pub(crate) fn first_spaced_text(scope: ElementRef<'_>, selectors: &[&str]) -> String {
    for css in selectors {
        if let Some(el) = scope.select(&sel(css)).next() {
            let text = spaced_text_of(el);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}
