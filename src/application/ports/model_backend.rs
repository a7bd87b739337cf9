use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ModelBackendError {
    ApiError(String),
    ParseError(String),
    InvalidInput(String),
}

impl std::fmt::Display for ModelBackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelBackendError::ApiError(msg) => write!(f, "API error: {}", msg),
            ModelBackendError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ModelBackendError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ModelBackendError {}

/// Where page classification inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// A managed SageMaker endpoint hosting the page classifier.
    SageMaker,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::SageMaker => "sagemaker",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload understood by the page classification model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageClassificationRequest {
    pub input_image: String,
    pub prompt: String,
    pub debug: u8,
}

impl PageClassificationRequest {
    pub fn for_image(image_uri: &str) -> Self {
        Self {
            input_image: image_uri.to_string(),
            prompt: String::new(),
            debug: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PagePrediction {
    pub prediction: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn classify_page(
        &self,
        request: &PageClassificationRequest,
    ) -> Result<PagePrediction, ModelBackendError>;

    fn kind(&self) -> BackendKind;
}
