use async_trait::async_trait;

use crate::domain::entities::Document;

#[derive(Debug)]
pub enum DocumentSyncError {
    NetworkError(String),
    ApiError(String),
    SerializationError(String),
}

impl std::fmt::Display for DocumentSyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSyncError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DocumentSyncError::ApiError(msg) => write!(f, "API error: {}", msg),
            DocumentSyncError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DocumentSyncError {}

/// Publishes the current state of a document to the tracking store so
/// dashboards and the workflow see every status transition.
#[async_trait]
pub trait DocumentSync: Send + Sync {
    async fn update_document(&self, document: &Document) -> Result<(), DocumentSyncError>;
}
