use thiserror::Error;

/// Price text that could not be interpreted as a numeric value.
///
/// Always handled at the adapter boundary: the affected item is dropped and
/// the rest of the page continues to parse.
#[derive(Debug, Error)]
#[error("unrecognized price text: {text:?}")]
pub struct PriceParseError {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("blocked by anti-automation defenses at {url}")]
    Blocked { url: String },

    #[error("expected element missing: {selector}")]
    Structure { selector: String },

    #[error(transparent)]
    Price(#[from] PriceParseError),
}
