pub mod clean;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod stores;
pub mod types;
pub mod units;

pub use clean::clean_price;
pub use error::{PriceParseError, ScrapeError};
pub use fetch::{is_blocked, HttpFetcher, PageFetcher};
pub use normalize::normalize_record;
pub use stores::{adapter_for, StoreAdapter};
pub use types::{ExtractStatus, ExtractedItem};
