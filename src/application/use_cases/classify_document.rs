use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::config_provider::ConfigMap;
use crate::application::ports::document_classifier::{
    ClassificationOutcome, ClassifierSettings, SAGEMAKER_ENDPOINT_KEY,
};
use crate::application::ports::document_sync::DocumentSyncError;
use crate::application::ports::metrics_sink::{MetricUnit, MetricsError};
use crate::application::ports::model_backend::BackendKind;
use crate::application::ports::{ClassifierFactory, ConfigProvider, DocumentSync, MetricsSink};
use crate::domain::entities::Document;
use crate::domain::value_objects::DocumentStatus;

pub const EMPTY_DOCUMENT_ERROR: &str = "Document has no pages to classify";
pub const REQUESTS_METRIC: &str = "ClassificationRequestsTotal";
pub const LATENCY_METRIC: &str = "ClassificationLatencyMs";

#[derive(Debug)]
pub enum ClassifyDocumentError {
    Validation(String),
    Classification(String),
    Configuration(String),
    ClassifierSetup(String),
    DocumentSync(String),
    Metrics(String),
}

impl std::fmt::Display for ClassifyDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyDocumentError::Validation(msg) => write!(f, "{}", msg),
            ClassifyDocumentError::Classification(msg) => write!(f, "{}", msg),
            ClassifyDocumentError::Configuration(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            ClassifyDocumentError::ClassifierSetup(msg) => {
                write!(f, "Classifier setup error: {}", msg)
            }
            ClassifyDocumentError::DocumentSync(msg) => write!(f, "Document sync error: {}", msg),
            ClassifyDocumentError::Metrics(msg) => write!(f, "Metrics error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifyDocumentError {}

impl From<DocumentSyncError> for ClassifyDocumentError {
    fn from(error: DocumentSyncError) -> Self {
        ClassifyDocumentError::DocumentSync(error.to_string())
    }
}

impl From<MetricsError> for ClassifyDocumentError {
    fn from(error: MetricsError) -> Self {
        ClassifyDocumentError::Metrics(error.to_string())
    }
}

/// Values fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyDocumentOptions {
    pub region: String,
    pub max_workers: usize,
    pub endpoint_name: String,
}

pub struct ClassifyDocumentUseCase {
    document_sync: Arc<dyn DocumentSync>,
    metrics_sink: Arc<dyn MetricsSink>,
    config_provider: Arc<dyn ConfigProvider>,
    classifier_factory: Arc<dyn ClassifierFactory>,
    options: ClassifyDocumentOptions,
}

impl ClassifyDocumentUseCase {
    pub fn new(
        document_sync: Arc<dyn DocumentSync>,
        metrics_sink: Arc<dyn MetricsSink>,
        config_provider: Arc<dyn ConfigProvider>,
        classifier_factory: Arc<dyn ClassifierFactory>,
        options: ClassifyDocumentOptions,
    ) -> Self {
        Self {
            document_sync,
            metrics_sink,
            config_provider,
            classifier_factory,
            options,
        }
    }

    #[tracing::instrument(skip_all, fields(document_id = %document.id))]
    pub async fn execute(&self, mut document: Document) -> Result<Document, ClassifyDocumentError> {
        document.set_status(DocumentStatus::Classifying);
        tracing::info!(status = %document.status, "Updating document status");
        self.document_sync.update_document(&document).await?;

        if !document.has_pages() {
            tracing::error!("{}", EMPTY_DOCUMENT_ERROR);
            document.fail(EMPTY_DOCUMENT_ERROR);
            self.document_sync.update_document(&document).await?;
            return Err(ClassifyDocumentError::Validation(
                EMPTY_DOCUMENT_ERROR.to_string(),
            ));
        }

        let start_time = Instant::now();

        self.metrics_sink
            .put_metric(
                REQUESTS_METRIC,
                document.page_count() as f64,
                MetricUnit::Count,
            )
            .await?;

        let config = match self.build_config().await {
            Ok(config) => config,
            Err(e) => return Err(self.abort(document, e).await),
        };

        let settings = ClassifierSettings {
            region: self.options.region.clone(),
            max_workers: self.options.max_workers,
            config,
            backend: BackendKind::SageMaker,
        };

        let classifier = match self.classifier_factory.create(settings) {
            Ok(classifier) => classifier,
            Err(e) => {
                let error = ClassifyDocumentError::ClassifierSetup(e.to_string());
                return Err(self.abort(document, error).await);
            }
        };

        match classifier.classify_document(document).await {
            ClassificationOutcome::Classified(document) => {
                let elapsed_ms = start_time.elapsed().as_millis() as u64;
                tracing::info!(elapsed_ms, "Time taken for classification");

                if let Err(e) = self
                    .metrics_sink
                    .put_metric(LATENCY_METRIC, elapsed_ms as f64, MetricUnit::Milliseconds)
                    .await
                {
                    tracing::warn!(error = %e, metric = LATENCY_METRIC, "Failed to record metric");
                }

                Ok(document)
            }
            ClassificationOutcome::Failed { document, detail } => {
                // The classifier already marked the document failed; publish it
                // again here so the workflow and the tracking store agree.
                let message = format!("Classification failed for document {}", document.id);
                tracing::error!(detail = %detail, "{}", message);
                self.document_sync.update_document(&document).await?;
                Err(ClassifyDocumentError::Classification(message))
            }
        }
    }

    async fn build_config(&self) -> Result<ConfigMap, ClassifyDocumentError> {
        let mut config = self
            .config_provider
            .get_config()
            .await
            .map_err(|e| ClassifyDocumentError::Configuration(e.to_string()))?
            .unwrap_or_default();

        config.insert(
            SAGEMAKER_ENDPOINT_KEY.to_string(),
            Value::String(self.options.endpoint_name.clone()),
        );

        Ok(config)
    }

    /// Marks the document failed and publishes it before handing the error back.
    async fn abort(
        &self,
        mut document: Document,
        error: ClassifyDocumentError,
    ) -> ClassifyDocumentError {
        tracing::error!(error = %error, "Aborting classification");
        document.fail(error.to_string());

        if let Err(sync_error) = self.document_sync.update_document(&document).await {
            tracing::warn!(error = %sync_error, "Failed to publish failed document status");
        }

        error
    }
}
