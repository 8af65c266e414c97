pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod records;

pub use app_config::AppConfig;
pub use catalog::{load_catalog, CatalogFile, CatalogProduct, Store};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use records::{NormalizedRecord, StandardUnit, StockStatus};
