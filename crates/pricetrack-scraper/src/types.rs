use pricetrack_core::StockStatus;

/// Outcome classification for one adapter invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStatus {
    Success,
    Blocked,
    Failed,
}

/// Transient result of parsing one product out of a retailer page.
///
/// Invariant: `status == Success` implies `price` is set and `name` is
/// non-empty, enforced by the [`ExtractedItem::success`] constructor, which
/// is the only way adapters produce successful items.
#[derive(Debug, Clone)]
pub struct ExtractedItem {
    /// Synthetic store-native key, only set for bulk/flyer extractions where
    /// the catalog does not pre-assign one.
    pub id: Option<String>,
    pub name: String,
    pub price: Option<f64>,
    pub currency: String,
    pub stock: StockStatus,
    /// Raw package-size text as printed on the page (e.g. `"907 g"`).
    pub raw_weight: String,
    /// Raw secondary/unit-price text (e.g. `"$2.49/lb"`, `"65¢/100g"`).
    pub unit_price_text: String,
    /// Outbound product link, when the page exposes one.
    pub url: Option<String>,
    pub status: ExtractStatus,
}

impl ExtractedItem {
    /// Builds a successful extraction. Returns `None` when the name/price
    /// invariant would be violated, so callers skip the item instead of
    /// emitting a malformed success.
    #[must_use]
    pub fn success(
        name: String,
        price: f64,
        raw_weight: String,
        unit_price_text: String,
    ) -> Option<Self> {
        if name.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: None,
            name,
            price: Some(price),
            currency: "CAD".to_string(),
            stock: StockStatus::InStock,
            raw_weight,
            unit_price_text,
            url: None,
            status: ExtractStatus::Success,
        })
    }

    /// Marker item for a page that hit anti-automation defenses.
    #[must_use]
    pub fn blocked() -> Self {
        Self {
            id: None,
            name: String::new(),
            price: None,
            currency: "CAD".to_string(),
            stock: StockStatus::Unknown,
            raw_weight: String::new(),
            unit_price_text: String::new(),
            url: None,
            status: ExtractStatus::Blocked,
        }
    }
}
