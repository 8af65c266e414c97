//! Scrape orchestration: the per-cycle state machine and the ports it talks
//! through.
//!
//! A cycle is strictly sequential: one fetch at a time, each preceded by a
//! randomized delay. That is a politeness/evasion constraint, not an
//! oversight. Parallel requests would defeat the delay and make the traffic
//! pattern fingerprintable.

mod cycle;

use std::future::Future;
use std::time::Duration;

use pricetrack_core::{AppConfig, NormalizedRecord};

pub use cycle::{run_cycle, scan_product, CycleTotals, ProductOutcome};
pub(crate) use cycle::process_extracted;

/// Storage port for the last-known-price read and the history write.
///
/// `save` is not idempotent-on-retry; the orchestrator calls it at most once
/// per successful extraction.
pub trait PriceStore {
    fn last_price(
        &self,
        product_id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<f64>>> + Send;

    fn save(&self, record: &NormalizedRecord) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Flat-dataset port. Best-effort: failures are logged, never propagated.
pub trait DatasetSink {
    /// # Errors
    ///
    /// Implementations surface filesystem failures; the orchestrator logs
    /// and continues.
    fn append(&self, record: &NormalizedRecord) -> anyhow::Result<()>;
}

/// Price-change notification port. Best-effort by contract: implementations
/// swallow their own failures.
pub trait ChangeNotifier {
    fn notify_change(
        &self,
        product_name: &str,
        old_price: f64,
        new_price: f64,
    ) -> impl Future<Output = ()> + Send;
}

/// Observable timing knobs for one cycle. Injected so the state machine is
/// testable without real wall-clock delays.
#[derive(Debug, Clone)]
pub struct CyclePolicy {
    /// Randomized pre-fetch delay window in milliseconds.
    pub fetch_delay_ms: (u64, u64),
    /// Cooldown before the single post-block retry.
    pub blocked_cooldown: Duration,
}

impl CyclePolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fetch_delay_ms: (config.fetch_delay_min_ms, config.fetch_delay_max_ms),
            blocked_cooldown: Duration::from_secs(config.blocked_cooldown_secs),
        }
    }

    /// Zero-delay policy for tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            fetch_delay_ms: (0, 0),
            blocked_cooldown: Duration::ZERO,
        }
    }
}

impl PriceStore for sqlx::SqlitePool {
    async fn last_price(&self, product_id: &str) -> anyhow::Result<Option<f64>> {
        Ok(pricetrack_db::history::get_last_price(self, product_id).await?)
    }

    async fn save(&self, record: &NormalizedRecord) -> anyhow::Result<()> {
        pricetrack_db::history::save_price(self, record).await?;
        Ok(())
    }
}

impl DatasetSink for pricetrack_db::dataset::DatasetWriter {
    fn append(&self, record: &NormalizedRecord) -> anyhow::Result<()> {
        Ok(pricetrack_db::dataset::DatasetWriter::append(self, record)?)
    }
}
