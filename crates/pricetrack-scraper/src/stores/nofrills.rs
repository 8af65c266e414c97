//! No Frills pages: product-detail pages and flyer/grid listings, detected
//! from the markup.

use scraper::{ElementRef, Html};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::clean::clean_price;
use crate::error::ScrapeError;
use crate::types::ExtractedItem;

use super::{first_spaced_text, first_text, sel, spaced_text_of, StoreAdapter};

const BASE_URL: &str = "https://www.nofrills.ca";

pub struct NoFrillsAdapter;

impl StoreAdapter for NoFrillsAdapter {
    fn parse(&self, html: &str) -> Vec<ExtractedItem> {
        let doc = Html::parse_document(html);

        // Detail pages carry a dedicated product-name heading.
        if doc
            .select(&sel("h1.product-name__item--name"))
            .next()
            .is_some()
        {
            debug!(store = "nofrills", "detected product detail page");
            return parse_detail(&doc).into_iter().collect();
        }

        let cards: Vec<ElementRef<'_>> = doc.select(&sel(".chakra-linkbox")).collect();
        debug!(store = "nofrills", cards = cards.len(), "parsing grid page");

        let mut items = Vec::new();
        for card in cards {
            match parse_card(card) {
                Ok(item) => items.push(item),
                Err(err) => {
                    // One bad card never fails the page.
                    debug!(store = "nofrills", error = %err, "skipping card");
                }
            }
        }
        items
    }
}

fn parse_detail(doc: &Html) -> Option<ExtractedItem> {
    let root = doc.root_element();

    let name = first_text(root, &["h1.product-name__item--name"]);
    let brand = first_text(root, &["span.product-name__item--brand"]);
    let full_name = format!("{brand} {name}").trim().to_string();

    let price_text = first_text(
        root,
        &[
            "span.price__value",
            ".selling-price-list__item__price--sale__value",
            ".selling-price-list__item__price--now-price__value",
        ],
    );
    let price = match clean_price(&price_text) {
        Ok(price) => price,
        Err(_) => {
            warn!(store = "nofrills", name = %full_name, "detail page missing price");
            return None;
        }
    };

    let package_text = first_text(root, &["span.product-name__item--package-size"]);
    let mut unit_price_text = first_text(root, &["span.price__unit"]);

    // The comparison-price list publishes standardized bases ($/kg, $/lb).
    // Per-kilogram wins outright; per-pound only fills in when no per-kg
    // text is already in hand.
    for comp in doc.select(&sel("ul.comparison-price-list li.comparison-price-list__item")) {
        let comp_text = spaced_text_of(comp);
        let lower = comp_text.to_lowercase();
        if lower.contains("kg") {
            unit_price_text = comp_text;
            break;
        } else if lower.contains("lb") && !unit_price_text.to_lowercase().contains("kg") {
            unit_price_text = comp_text;
        }
    }

    if unit_price_text.is_empty() {
        unit_price_text = package_text.clone();
    }

    ExtractedItem::success(full_name, price, package_text, unit_price_text)
}

fn parse_card(card: ElementRef<'_>) -> Result<ExtractedItem, ScrapeError> {
    let brand = first_text(card, &["[data-testid=\"product-brand\"]"]);
    let title = first_text(card, &["[data-testid=\"product-title\"]"]);
    if title.is_empty() {
        return Err(ScrapeError::Structure {
            selector: "[data-testid=product-title]".to_string(),
        });
    }
    let full_name = format!("{brand} {title}").trim().to_string();

    let price_text = first_spaced_text(
        card,
        &[
            "[data-testid=\"price-product-tile\"]",
            "[data-testid=\"sale-price\"]",
            "[data-testid=\"regular-price\"]",
        ],
    );
    if price_text.is_empty() {
        return Err(ScrapeError::Structure {
            selector: "[data-testid=price-product-tile]".to_string(),
        });
    }
    let price = clean_price(&price_text)?;

    let package_text = first_text(card, &["[data-testid=\"product-package-size\"]"]);

    let link = card
        .select(&sel("a.chakra-linkbox__overlay"))
        .next()
        .or_else(|| card.select(&sel("a")).next())
        .and_then(|a| a.value().attr("href"))
        .map(|href| {
            if href.starts_with('/') {
                format!("{BASE_URL}{href}")
            } else {
                href.to_string()
            }
        })
        .unwrap_or_default();

    let mut item = ExtractedItem::success(
        full_name.clone(),
        price,
        package_text.clone(),
        package_text,
    )
    .ok_or_else(|| ScrapeError::Structure {
        selector: "[data-testid=product-title]".to_string(),
    })?;

    item.id = Some(product_key(&link, &full_name));
    if !link.is_empty() {
        item.url = Some(link);
    }
    Ok(item)
}

/// Store-native key for a grid card: the detail-page path segment when the
/// card links out, otherwise a deterministic digest of the product name so
/// repeated flyer imports land on the same key.
fn product_key(link: &str, full_name: &str) -> String {
    if let Some((_, tail)) = link.split_once("/p/") {
        let segment = tail.split('?').next().unwrap_or(tail);
        if !segment.is_empty() {
            return format!("nf-{segment}");
        }
    }
    let digest = Sha256::digest(full_name.as_bytes());
    let hex = format!("{digest:x}");
    format!("nf-auto-{}", &hex[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractStatus;

    const DETAIL_PAGE: &str = r#"
<html><body>
  <span class="product-name__item--brand">No Name</span>
  <h1 class="product-name__item--name">Chicken Breast</h1>
  <span class="product-name__item--package-size">907 g</span>
  <span class="price__value">$12.00</span>
  <span class="price__unit">$1.32/100g</span>
  <ul class="comparison-price-list">
    <li class="comparison-price-list__item">$6.00 / lb</li>
    <li class="comparison-price-list__item">$13.23 / kg</li>
  </ul>
</body></html>"#;

    const GRID_PAGE: &str = r#"
<html><body>
  <div class="chakra-linkbox">
    <span data-testid="product-brand">No Name</span>
    <span data-testid="product-title">Large Eggs</span>
    <div data-testid="price-product-tile"><span>$3.49</span></div>
    <span data-testid="product-package-size">12 un</span>
    <a class="chakra-linkbox__overlay" href="/p/large-eggs-12ct?source=flyer"></a>
  </div>
  <div class="chakra-linkbox">
    <span data-testid="product-title">Mystery Deal</span>
  </div>
  <div class="chakra-linkbox">
    <span data-testid="product-brand">Farmer's Market</span>
    <div data-testid="sale-price">99c</div>
  </div>
</body></html>"#;

    #[test]
    fn detail_page_concatenates_brand_and_name() {
        let items = NoFrillsAdapter.parse(DETAIL_PAGE);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "No Name Chicken Breast");
        assert_eq!(items[0].price, Some(12.00));
    }

    #[test]
    fn detail_page_prefers_per_kg_comparison_price() {
        let items = NoFrillsAdapter.parse(DETAIL_PAGE);
        assert_eq!(items[0].unit_price_text, "$13.23 / kg");
    }

    #[test]
    fn detail_page_keeps_per_lb_when_no_kg_row_exists() {
        let html = r#"
<html><body>
  <h1 class="product-name__item--name">Pork Belly</h1>
  <span class="price__value">$9.00</span>
  <ul class="comparison-price-list">
    <li class="comparison-price-list__item">$4.08 / lb</li>
  </ul>
</body></html>"#;
        let items = NoFrillsAdapter.parse(html);
        assert_eq!(items[0].unit_price_text, "$4.08 / lb");
    }

    #[test]
    fn grid_page_skips_cards_without_name_and_price() {
        let items = NoFrillsAdapter.parse(GRID_PAGE);
        // Three cards; only the first has both a title and a price.
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "No Name Large Eggs");
        assert_eq!(items[0].price, Some(3.49));
        assert_eq!(items[0].status, ExtractStatus::Success);
    }

    #[test]
    fn grid_card_key_comes_from_detail_path() {
        let items = NoFrillsAdapter.parse(GRID_PAGE);
        assert_eq!(items[0].id.as_deref(), Some("nf-large-eggs-12ct"));
        assert_eq!(
            items[0].url.as_deref(),
            Some("https://www.nofrills.ca/p/large-eggs-12ct?source=flyer")
        );
    }

    #[test]
    fn synthetic_key_is_deterministic() {
        let a = product_key("", "No Name Large Eggs");
        let b = product_key("", "No Name Large Eggs");
        assert_eq!(a, b);
        assert!(a.starts_with("nf-auto-"));
    }

    #[test]
    fn blank_page_parses_to_empty_list() {
        assert!(NoFrillsAdapter.parse("<html></html>").is_empty());
    }
}
