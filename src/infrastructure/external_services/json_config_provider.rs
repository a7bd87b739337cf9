use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::application::ports::ConfigProvider;
use crate::application::ports::config_provider::{ConfigMap, ConfigProviderError};

/// Reads the shared pipeline configuration from a JSON file, or from inline
/// JSON when no file is deployed. The source is re-read on every call so a
/// warm container picks up configuration changes.
#[derive(Debug, Clone, Default)]
pub struct JsonConfigProvider {
    path: Option<PathBuf>,
    inline: Option<String>,
}

impl JsonConfigProvider {
    pub fn new(path: Option<PathBuf>, inline: Option<String>) -> Self {
        Self { path, inline }
    }

    fn parse(raw: &str) -> Result<Option<ConfigMap>, ConfigProviderError> {
        match serde_json::from_str::<Value>(raw)
            .map_err(|e| ConfigProviderError::ParseError(e.to_string()))?
        {
            Value::Object(config) => Ok(Some(config)),
            Value::Null => Ok(None),
            other => Err(ConfigProviderError::InvalidFormat(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl ConfigProvider for JsonConfigProvider {
    async fn get_config(&self) -> Result<Option<ConfigMap>, ConfigProviderError> {
        if let Some(path) = &self.path {
            let raw = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigProviderError::IoError(format!("{}: {}", path.display(), e)))?;
            return Self::parse(&raw);
        }

        match &self.inline {
            Some(raw) => Self::parse(raw),
            None => Ok(None),
        }
    }
}
