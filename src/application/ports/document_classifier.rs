use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::config_provider::ConfigMap;
use crate::application::ports::model_backend::BackendKind;
use crate::domain::entities::Document;

/// Config key naming the SageMaker endpoint that serves the classifier.
pub const SAGEMAKER_ENDPOINT_KEY: &str = "sagemaker_endpoint_name";

#[derive(Debug)]
pub enum ClassifierError {
    MissingConfiguration(String),
    InvalidConfiguration(String),
}

impl std::fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierError::MissingConfiguration(key) => {
                write!(f, "Missing configuration: {}", key)
            }
            ClassifierError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for ClassifierError {}

/// Everything needed to build a classifier for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    pub region: String,
    pub max_workers: usize,
    pub config: ConfigMap,
    pub backend: BackendKind,
}

impl ClassifierSettings {
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(|value| value.as_str())
    }
}

/// Result of classifying a document. Both variants hand the document back
/// because a failed document still has to be published.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Classified(Document),
    Failed { document: Document, detail: String },
}

#[cfg(test)]
impl ClassificationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ClassificationOutcome::Failed { .. })
    }

    pub fn document(&self) -> &Document {
        match self {
            ClassificationOutcome::Classified(document) => document,
            ClassificationOutcome::Failed { document, .. } => document,
        }
    }

    pub fn into_document(self) -> Document {
        match self {
            ClassificationOutcome::Classified(document) => document,
            ClassificationOutcome::Failed { document, .. } => document,
        }
    }
}

#[async_trait]
pub trait DocumentClassifier: Send + Sync {
    async fn classify_document(&self, document: Document) -> ClassificationOutcome;
}

pub trait ClassifierFactory: Send + Sync {
    fn create(
        &self,
        settings: ClassifierSettings,
    ) -> Result<Arc<dyn DocumentClassifier>, ClassifierError>;
}
