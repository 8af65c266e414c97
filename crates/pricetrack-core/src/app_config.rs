use std::path::PathBuf;

use crate::catalog::Store;

/// Process-wide configuration, loaded once at startup and threaded through
/// as read-only context.
#[derive(Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub dataset_path: PathBuf,
    pub catalog_path: PathBuf,
    pub canonical_products_path: PathBuf,
    pub alias_config_path: PathBuf,
    pub alias_proposal_path: PathBuf,
    /// Discord-style webhook for price-change alerts. `None` means dry-run
    /// (alerts are logged only).
    pub webhook_url: Option<String>,
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Randomized pre-fetch delay window, in milliseconds.
    pub fetch_delay_min_ms: u64,
    pub fetch_delay_max_ms: u64,
    /// Cooldown before the single retry after a blocked response.
    pub blocked_cooldown_secs: u64,
    /// Stores included in a scan cycle; catalog entries for other stores
    /// are filtered out before the cycle begins.
    pub enabled_stores: Vec<Store>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_path", &self.database_path)
            .field("dataset_path", &self.dataset_path)
            .field("catalog_path", &self.catalog_path)
            .field("canonical_products_path", &self.canonical_products_path)
            .field("alias_config_path", &self.alias_config_path)
            .field("alias_proposal_path", &self.alias_proposal_path)
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("fetch_delay_min_ms", &self.fetch_delay_min_ms)
            .field("fetch_delay_max_ms", &self.fetch_delay_max_ms)
            .field("blocked_cooldown_secs", &self.blocked_cooldown_secs)
            .field("enabled_stores", &self.enabled_stores)
            .finish()
    }
}
