use thiserror::Error;

/// Reasons a whole `send` can be refused before any request goes out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Select at least one model.")]
    NoModelSelected,
}

/// Transport-level failures from a provider client.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not find config directory")]
    NoConfigDir,
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode stored value: {0}")]
    Serde(#[from] serde_json::Error),
}
