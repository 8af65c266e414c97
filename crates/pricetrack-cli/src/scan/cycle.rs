//! The per-product scrape state machine and the cycle loop around it.

use chrono::Utc;
use pricetrack_core::CatalogProduct;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info, warn};

use pricetrack_scraper::{
    adapter_for, is_blocked, normalize_record, ExtractedItem, PageFetcher, ScrapeError,
};

use super::{ChangeNotifier, CyclePolicy, DatasetSink, PriceStore};

/// A price is considered changed when it moves by at least half a cent;
/// anything smaller is float noise from the normalization math.
const CHANGE_TOLERANCE: f64 = 0.005;

/// Terminal outcome for one product within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOutcome {
    Stored { changed: bool },
    Blocked,
    FetchFailed,
    ParseFailed,
}

/// Per-product fetch states. `Blocked` loops back to `Fetching` exactly
/// once; everything else is terminal.
enum FetchState {
    Pending,
    Fetching { attempt: u32 },
    Blocked { attempt: u32 },
}

/// Aggregated counts for one cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleTotals {
    pub stored: usize,
    pub changed: usize,
    pub blocked: usize,
    pub fetch_failed: usize,
    pub parse_failed: usize,
    pub store_failed: usize,
}

/// Runs the fetch state machine for one URL: jittered delay, fetch, blocked
/// classification, and the single cooldown-then-retry on a blocked response.
async fn fetch_with_retry<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    policy: &CyclePolicy,
) -> Result<String, ScrapeError> {
    let mut state = FetchState::Pending;

    loop {
        state = match state {
            FetchState::Pending => FetchState::Fetching { attempt: 1 },

            FetchState::Fetching { attempt } => {
                jittered_delay(policy).await;
                match fetcher.fetch(url).await {
                    Ok(html) if is_blocked(&html) => FetchState::Blocked { attempt },
                    Ok(html) => return Ok(html),
                    Err(err) => return Err(err),
                }
            }

            FetchState::Blocked { attempt } => {
                if attempt >= 2 {
                    return Err(ScrapeError::Blocked {
                        url: url.to_string(),
                    });
                }
                warn!(
                    url,
                    cooldown_secs = policy.blocked_cooldown.as_secs(),
                    "blocked response, retrying once after cooldown"
                );
                tokio::time::sleep(policy.blocked_cooldown).await;
                FetchState::Fetching { attempt: attempt + 1 }
            }
        };
    }
}

async fn jittered_delay(policy: &CyclePolicy) {
    let (min, max) = policy.fetch_delay_ms;
    if max == 0 {
        return;
    }
    let delay_ms = {
        let mut rng = rand::rng();
        rng.random_range(min..=max)
    };
    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
}

/// Fetches, parses, normalizes, and stores one catalog product.
///
/// # Errors
///
/// Only storage failures escape; every scrape-level failure is folded into
/// the returned [`ProductOutcome`].
pub async fn scan_product<F, S, D, N>(
    fetcher: &F,
    store: &S,
    dataset: &D,
    notifier: &N,
    product: &CatalogProduct,
    policy: &CyclePolicy,
) -> anyhow::Result<ProductOutcome>
where
    F: PageFetcher,
    S: PriceStore,
    D: DatasetSink,
    N: ChangeNotifier,
{
    match fetch_with_retry(fetcher, &product.url, policy).await {
        Ok(html) => {
            let items = adapter_for(product.store).parse(&html);
            match items.first() {
                Some(item) => process_extracted(item, product, store, dataset, notifier).await,
                None => {
                    warn!(
                        product = %product.id,
                        store = %product.store,
                        "failed to extract a price from the page"
                    );
                    Ok(ProductOutcome::ParseFailed)
                }
            }
        }
        Err(ScrapeError::Blocked { .. }) => {
            error!(
                product = %product.id,
                store = %product.store,
                "still blocked after retry, giving up for this cycle"
            );
            Ok(ProductOutcome::Blocked)
        }
        Err(err) => {
            error!(
                product = %product.id,
                url = %product.url,
                error = %err,
                "fetch failed"
            );
            Ok(ProductOutcome::FetchFailed)
        }
    }
}

/// Normalizes an extracted item and hands it to the storage/notification
/// collaborators. The last-price read happens immediately before the write;
/// the orchestrator is the sole writer, so no stronger guarantee is needed.
pub(crate) async fn process_extracted<S, D, N>(
    item: &ExtractedItem,
    product: &CatalogProduct,
    store: &S,
    dataset: &D,
    notifier: &N,
) -> anyhow::Result<ProductOutcome>
where
    S: PriceStore,
    D: DatasetSink,
    N: ChangeNotifier,
{
    let Some(record) = normalize_record(item, product, Utc::now()) else {
        warn!(product = %product.id, "extracted item carried no price");
        return Ok(ProductOutcome::ParseFailed);
    };

    let last_price = store.last_price(&product.id).await?;
    store.save(&record).await?;

    if let Err(err) = dataset.append(&record) {
        warn!(product = %product.id, error = %err, "dataset append failed");
    }

    let mut changed = false;
    if let Some(old_price) = last_price {
        if (old_price - record.price).abs() >= CHANGE_TOLERANCE {
            changed = true;
            notifier
                .notify_change(&record.product_name, old_price, record.price)
                .await;
        }
    }

    info!(
        product = %product.id,
        store = %product.store,
        price = record.price,
        unit_price = record.unit_price,
        standard_unit = %record.standard_unit,
        changed,
        "stored price observation"
    );

    Ok(ProductOutcome::Stored { changed })
}

/// Runs one full cycle over `products`, in randomized order so the request
/// pattern is not a fixed fingerprint. One product's failure never aborts
/// the rest.
pub async fn run_cycle<F, S, D, N>(
    fetcher: &F,
    store: &S,
    dataset: &D,
    notifier: &N,
    mut products: Vec<CatalogProduct>,
    policy: &CyclePolicy,
) -> CycleTotals
where
    F: PageFetcher,
    S: PriceStore,
    D: DatasetSink,
    N: ChangeNotifier,
{
    products.shuffle(&mut rand::rng());
    info!(products = products.len(), "starting scan cycle");

    let mut totals = CycleTotals::default();
    for product in &products {
        match scan_product(fetcher, store, dataset, notifier, product, policy).await {
            Ok(ProductOutcome::Stored { changed }) => {
                totals.stored += 1;
                if changed {
                    totals.changed += 1;
                }
            }
            Ok(ProductOutcome::Blocked) => totals.blocked += 1,
            Ok(ProductOutcome::FetchFailed) => totals.fetch_failed += 1,
            Ok(ProductOutcome::ParseFailed) => totals.parse_failed += 1,
            Err(err) => {
                error!(product = %product.id, error = %err, "storage error for product");
                totals.store_failed += 1;
            }
        }
    }

    info!(
        stored = totals.stored,
        changed = totals.changed,
        blocked = totals.blocked,
        fetch_failed = totals.fetch_failed,
        parse_failed = totals.parse_failed,
        store_failed = totals.store_failed,
        "scan cycle complete"
    );
    totals
}

#[cfg(test)]
#[path = "cycle_test.rs"]
mod tests;
