use thiserror::Error;

#[derive(Debug, Error)]
pub enum AliasError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse alias settings: {0}")]
    Settings(#[from] serde_yaml::Error),

    #[error("malformed reference data on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}
