mod alias_cmd;
mod import;
mod notify;
mod scan;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pricetrack_core::{load_app_config, load_catalog, AppConfig};
use pricetrack_db::dataset::DatasetWriter;
use pricetrack_scraper::HttpFetcher;

use crate::notify::Notifier;
use crate::scan::{run_cycle, CyclePolicy};

#[derive(Debug, Parser)]
#[command(name = "pricetrack")]
#[command(about = "Grocery price extraction and normalization pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one scan cycle over the active catalog
    Scan {
        /// Restrict the cycle to the single catalog product with this exact URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Parse saved HTML files through the store adapters
    Import {
        /// Directory of `<catalog-id>.html` files to batch-import
        #[arg(long, conflicts_with = "file")]
        dir: Option<PathBuf>,
        /// Single HTML file to import (requires --product-id)
        #[arg(long, requires = "product_id")]
        file: Option<PathBuf>,
        /// Catalog product id for --file
        #[arg(long)]
        product_id: Option<String>,
    },
    /// Alias-resolution utilities
    Alias {
        #[command(subcommand)]
        command: AliasCommands,
    },
}

#[derive(Debug, Subcommand)]
enum AliasCommands {
    /// Generate the alias proposal table for review
    Generate,
    /// List approved aliases from the reviewed proposal table
    Approved,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan { url } => run_scan(&config, url).await,
        Commands::Import {
            dir,
            file,
            product_id,
        } => run_import(&config, dir, file, product_id).await,
        Commands::Alias { command } => match command {
            AliasCommands::Generate => alias_cmd::generate(&config),
            AliasCommands::Approved => alias_cmd::approved(&config),
        },
    }
}

async fn run_scan(config: &AppConfig, url: Option<String>) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path).context("loading catalog")?;
    let all = catalog.products.len();
    let mut products = catalog.scannable(&config.enabled_stores);
    if products.len() < all {
        info!(
            active = products.len(),
            total = all,
            "filtered catalog to active products in enabled stores"
        );
    }

    if let Some(url) = url {
        products.retain(|p| p.url == url);
        if products.is_empty() {
            anyhow::bail!("URL not found in catalog: {url}");
        }
        info!(url = %products[0].url, "running single-product debug scan");
    }

    let pool = pricetrack_db::connect_pool(&config.database_path)
        .await
        .context("opening history database")?;
    let dataset = DatasetWriter::new(&config.dataset_path);
    let notifier = Notifier::new(config.webhook_url.clone());
    let fetcher = HttpFetcher::new(config.request_timeout_secs, &config.user_agent)
        .context("building fetcher")?;
    let policy = CyclePolicy::from_config(config);

    let totals = run_cycle(&fetcher, &pool, &dataset, &notifier, products, &policy).await;

    // The shared fetch session and the pool live for exactly one cycle.
    pool.close().await;

    if totals.stored == 0 && totals.blocked + totals.fetch_failed + totals.parse_failed > 0 {
        anyhow::bail!("scan cycle stored nothing: {totals:?}");
    }
    Ok(())
}

async fn run_import(
    config: &AppConfig,
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
    product_id: Option<String>,
) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path).context("loading catalog")?;
    let products = catalog.scannable(&config.enabled_stores);

    let pool = pricetrack_db::connect_pool(&config.database_path)
        .await
        .context("opening history database")?;
    let dataset = DatasetWriter::new(&config.dataset_path);
    let notifier = Notifier::new(config.webhook_url.clone());

    let result = match (dir, file) {
        (Some(dir), None) => import::import_dir(&dir, &products, &pool, &dataset, &notifier)
            .await
            .map(|_| ()),
        (None, Some(file)) => {
            let product_id =
                product_id.context("--product-id is required when using --file")?;
            import::import_file(&file, &product_id, &products, &pool, &dataset, &notifier).await
        }
        _ => Err(anyhow::anyhow!("pass exactly one of --dir or --file")),
    };

    pool.close().await;
    result
}
