use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::catalog::Store;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_path = PathBuf::from(or_default("PRICETRACK_DB_PATH", "./data/history.db"));
    let dataset_path = PathBuf::from(or_default(
        "PRICETRACK_DATASET_PATH",
        "./data/price_dataset.csv",
    ));
    let catalog_path = PathBuf::from(or_default("PRICETRACK_CATALOG_PATH", "./config/catalog.yaml"));
    let canonical_products_path = PathBuf::from(or_default(
        "PRICETRACK_CANONICAL_PATH",
        "./data/canonical_products.csv",
    ));
    let alias_config_path = PathBuf::from(or_default(
        "PRICETRACK_ALIAS_CONFIG_PATH",
        "./config/alias.yaml",
    ));
    let alias_proposal_path = PathBuf::from(or_default(
        "PRICETRACK_ALIAS_PROPOSAL_PATH",
        "./data/product_mapping.csv",
    ));

    let webhook_url = lookup("PRICETRACK_WEBHOOK_URL").ok().filter(|s| !s.is_empty());
    let log_level = or_default("PRICETRACK_LOG_LEVEL", "info");
    let user_agent = or_default(
        "PRICETRACK_USER_AGENT",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    );

    let request_timeout_secs = parse_u64("PRICETRACK_REQUEST_TIMEOUT_SECS", "30")?;
    let fetch_delay_min_ms = parse_u64("PRICETRACK_FETCH_DELAY_MIN_MS", "2000")?;
    let fetch_delay_max_ms = parse_u64("PRICETRACK_FETCH_DELAY_MAX_MS", "5000")?;
    let blocked_cooldown_secs = parse_u64("PRICETRACK_BLOCKED_COOLDOWN_SECS", "45")?;

    if fetch_delay_max_ms < fetch_delay_min_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICETRACK_FETCH_DELAY_MAX_MS".to_string(),
            reason: format!(
                "must be >= PRICETRACK_FETCH_DELAY_MIN_MS ({fetch_delay_min_ms})"
            ),
        });
    }

    let enabled_stores =
        parse_enabled_stores(&or_default("PRICETRACK_ENABLED_STORES", "nofrills,foodbasics,metro"))?;

    Ok(AppConfig {
        database_path,
        dataset_path,
        catalog_path,
        canonical_products_path,
        alias_config_path,
        alias_proposal_path,
        webhook_url,
        log_level,
        user_agent,
        request_timeout_secs,
        fetch_delay_min_ms,
        fetch_delay_max_ms,
        blocked_cooldown_secs,
        enabled_stores,
    })
}

fn parse_enabled_stores(raw: &str) -> Result<Vec<Store>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Store::from_str(s).map_err(|_| ConfigError::InvalidEnvVar {
                var: "PRICETRACK_ENABLED_STORES".to_string(),
                reason: format!("unknown store identifier \"{s}\""),
            })
        })
        .collect()
}
