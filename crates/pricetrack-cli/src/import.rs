//! Local HTML import: runs saved pages through the store adapters and the
//! normal storage pipeline. This is the manual path for retailers whose
//! anti-automation defenses make live fetching impractical.

use std::path::Path;

use anyhow::Context;
use pricetrack_core::CatalogProduct;
use pricetrack_scraper::{adapter_for, is_blocked};
use tracing::{info, warn};

use crate::notify::Notifier;
use crate::scan::{DatasetSink, PriceStore};

/// Imports every `<catalog-id>.html` file in `dir`. Files without a catalog
/// match are logged and skipped. Returns the number of stored records.
pub async fn import_dir<S: PriceStore, D: DatasetSink>(
    dir: &Path,
    products: &[CatalogProduct],
    store: &S,
    dataset: &D,
    notifier: &Notifier,
) -> anyhow::Result<usize> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading import dir {}", dir.display()))?;

    let mut imported = 0usize;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(product_id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let Some(product) = products.iter().find(|p| p.id == product_id) else {
            warn!(
                file = %path.display(),
                "ignoring file: product id not found in catalog"
            );
            continue;
        };

        if import_one(&path, product, store, dataset, notifier).await? {
            imported += 1;
        }
    }

    info!(imported, "batch import complete");
    Ok(imported)
}

/// Imports a single saved page for an explicitly named catalog product.
pub async fn import_file<S: PriceStore, D: DatasetSink>(
    file: &Path,
    product_id: &str,
    products: &[CatalogProduct],
    store: &S,
    dataset: &D,
    notifier: &Notifier,
) -> anyhow::Result<()> {
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .with_context(|| format!("product id \"{product_id}\" not found in catalog"))?;

    if !import_one(file, product, store, dataset, notifier).await? {
        anyhow::bail!("no price could be extracted from {}", file.display());
    }
    Ok(())
}

async fn import_one<S: PriceStore, D: DatasetSink>(
    path: &Path,
    product: &CatalogProduct,
    store: &S,
    dataset: &D,
    notifier: &Notifier,
) -> anyhow::Result<bool> {
    info!(file = %path.display(), product = %product.id, "importing saved page");

    let html = std::fs::read_to_string(path)
        .with_context(|| format!("reading local file {}", path.display()))?;

    if is_blocked(&html) {
        warn!(
            product = %product.id,
            "saved page is an anti-automation challenge, not product content"
        );
        return Ok(false);
    }

    let items = adapter_for(product.store).parse(&html);
    let Some(item) = items.first() else {
        warn!(product = %product.id, "failed to extract price from saved page");
        return Ok(false);
    };

    let outcome =
        crate::scan::process_extracted(item, product, store, dataset, notifier).await?;
    Ok(matches!(
        outcome,
        crate::scan::ProductOutcome::Stored { .. }
    ))
}
