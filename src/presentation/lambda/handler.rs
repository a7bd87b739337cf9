use lambda_runtime::{Diagnostic, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

use crate::application::use_cases::{ClassifyDocumentError, ClassifyDocumentUseCase};
use crate::presentation::lambda::dto::{ClassificationEvent, ClassificationResponse};

#[derive(Debug)]
pub enum InvocationError {
    Deserialization(String),
    Serialization(String),
    ClassifyDocument(ClassifyDocumentError),
}

impl InvocationError {
    /// Error type reported to the workflow, which keys its retry policy on it.
    pub fn error_type(&self) -> &'static str {
        match self {
            InvocationError::Deserialization(_) => "DeserializationError",
            InvocationError::Serialization(_) => "SerializationError",
            InvocationError::ClassifyDocument(error) => match error {
                ClassifyDocumentError::Validation(_) => "ValidationError",
                ClassifyDocumentError::Classification(_) => "ClassificationError",
                ClassifyDocumentError::Configuration(_) => "ConfigurationError",
                ClassifyDocumentError::ClassifierSetup(_) => "ClassifierSetupError",
                ClassifyDocumentError::DocumentSync(_) => "DocumentSyncError",
                ClassifyDocumentError::Metrics(_) => "MetricsError",
            },
        }
    }
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationError::Deserialization(msg) => {
                write!(f, "Failed to deserialize document: {}", msg)
            }
            InvocationError::Serialization(msg) => {
                write!(f, "Failed to serialize response: {}", msg)
            }
            InvocationError::ClassifyDocument(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for InvocationError {}

impl From<ClassifyDocumentError> for InvocationError {
    fn from(error: ClassifyDocumentError) -> Self {
        InvocationError::ClassifyDocument(error)
    }
}

impl From<InvocationError> for Diagnostic {
    fn from(error: InvocationError) -> Diagnostic {
        Diagnostic {
            error_type: error.error_type().into(),
            error_message: error.to_string().into(),
        }
    }
}

pub struct ClassificationHandler {
    classify_document_use_case: Arc<ClassifyDocumentUseCase>,
}

impl ClassificationHandler {
    pub fn new(classify_document_use_case: Arc<ClassifyDocumentUseCase>) -> Self {
        Self {
            classify_document_use_case,
        }
    }

    pub async fn handle(&self, event: LambdaEvent<Value>) -> Result<Value, InvocationError> {
        let (payload, context) = event.into_parts();
        let span = tracing::info_span!("classification", request_id = %context.request_id);

        self.handle_payload(payload).instrument(span).await
    }

    pub async fn handle_payload(&self, payload: Value) -> Result<Value, InvocationError> {
        tracing::info!(event = %payload, "Event");

        let event: ClassificationEvent = serde_json::from_value(payload).map_err(|e| {
            tracing::error!(error = %e, "Malformed classification event");
            InvocationError::Deserialization(e.to_string())
        })?;

        let document = self
            .classify_document_use_case
            .execute(event.ocr_result.document)
            .await?;

        let response = serde_json::to_value(ClassificationResponse { document })
            .map_err(|e| InvocationError::Serialization(e.to_string()))?;

        tracing::info!(response = %response, "Response");
        Ok(response)
    }
}
