use async_trait::async_trait;
use serde_json::{Map, Value};

/// Free-form configuration shared by the pipeline stages.
pub type ConfigMap = Map<String, Value>;

#[derive(Debug)]
pub enum ConfigProviderError {
    IoError(String),
    ParseError(String),
    InvalidFormat(String),
}

impl std::fmt::Display for ConfigProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigProviderError::IoError(msg) => write!(f, "IO error: {}", msg),
            ConfigProviderError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigProviderError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
        }
    }
}

impl std::error::Error for ConfigProviderError {}

#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Returns `None` when no configuration has been deployed.
    async fn get_config(&self) -> Result<Option<ConfigMap>, ConfigProviderError>;
}
