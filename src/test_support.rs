//! In-memory stand-ins for the collaborators of the classification flow.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::application::ports::config_provider::{ConfigMap, ConfigProviderError};
use crate::application::ports::document_classifier::{
    ClassificationOutcome, ClassifierError, ClassifierSettings,
};
use crate::application::ports::document_sync::DocumentSyncError;
use crate::application::ports::metrics_sink::{MetricUnit, MetricsError};
use crate::application::ports::{
    ClassifierFactory, ConfigProvider, DocumentClassifier, DocumentSync, MetricsSink,
};
use crate::domain::entities::{Document, Page};

pub fn paged_document(id: &str, pages: usize) -> Document {
    let pages = (1..=pages)
        .map(|n| Page::new(n.to_string()).with_image_uri(format!("s3://output/{}/pages/{}.jpg", id, n)))
        .collect();
    Document::new(id).with_pages(pages)
}

pub struct RecordingSync {
    updates: Mutex<Vec<Document>>,
    fail: bool,
}

impl RecordingSync {
    pub fn new() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn updates(&self) -> Vec<Document> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSync for RecordingSync {
    async fn update_document(&self, document: &Document) -> Result<(), DocumentSyncError> {
        if self.fail {
            return Err(DocumentSyncError::NetworkError("connection refused".to_string()));
        }
        self.updates.lock().unwrap().push(document.clone());
        Ok(())
    }
}

pub struct RecordingMetrics {
    recorded: Mutex<Vec<(String, f64)>>,
    accepted_writes: Option<usize>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            accepted_writes: None,
        }
    }

    /// Accepts the first `writes` metrics, then fails every later write.
    pub fn failing_after(writes: usize) -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            accepted_writes: Some(writes),
        }
    }

    pub fn recorded(&self) -> Vec<(String, f64)> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSink for RecordingMetrics {
    async fn put_metric(
        &self,
        name: &str,
        value: f64,
        _unit: MetricUnit,
    ) -> Result<(), MetricsError> {
        let mut recorded = self.recorded.lock().unwrap();
        if self.accepted_writes.is_some_and(|limit| recorded.len() >= limit) {
            return Err(MetricsError::WriteError("stdout closed".to_string()));
        }
        recorded.push((name.to_string(), value));
        Ok(())
    }
}

pub struct StaticConfig {
    config: Result<Option<ConfigMap>, String>,
}

impl StaticConfig {
    pub fn none() -> Self {
        Self { config: Ok(None) }
    }

    pub fn some(config: Value) -> Self {
        Self {
            config: Ok(config.as_object().cloned()),
        }
    }

    pub fn broken() -> Self {
        Self {
            config: Err("configuration table unreachable".to_string()),
        }
    }
}

#[async_trait]
impl ConfigProvider for StaticConfig {
    async fn get_config(&self) -> Result<Option<ConfigMap>, ConfigProviderError> {
        self.config
            .clone()
            .map_err(ConfigProviderError::IoError)
    }
}

#[derive(Clone, Copy)]
enum Script {
    Succeed,
    Fail,
    Unavailable,
}

/// Builds classifiers that label every page "invoice" (or fail), recording
/// the settings it was asked for and every document it handed back.
pub struct RecordingFactory {
    script: Script,
    settings: Mutex<Vec<ClassifierSettings>>,
    returned: Arc<Mutex<Vec<Document>>>,
}

impl RecordingFactory {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            settings: Mutex::new(Vec::new()),
            returned: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_script(Script::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    pub fn unavailable() -> Self {
        Self::with_script(Script::Unavailable)
    }

    pub fn settings(&self) -> Vec<ClassifierSettings> {
        self.settings.lock().unwrap().clone()
    }

    pub fn returned_documents(&self) -> Vec<Document> {
        self.returned.lock().unwrap().clone()
    }
}

impl ClassifierFactory for RecordingFactory {
    fn create(
        &self,
        settings: ClassifierSettings,
    ) -> Result<Arc<dyn DocumentClassifier>, ClassifierError> {
        if let Script::Unavailable = self.script {
            return Err(ClassifierError::InvalidConfiguration(
                "endpoint is not in service".to_string(),
            ));
        }
        self.settings.lock().unwrap().push(settings);
        Ok(Arc::new(ScriptedClassifier {
            fail: matches!(self.script, Script::Fail),
            returned: self.returned.clone(),
        }))
    }
}

struct ScriptedClassifier {
    fail: bool,
    returned: Arc<Mutex<Vec<Document>>>,
}

#[async_trait]
impl DocumentClassifier for ScriptedClassifier {
    async fn classify_document(&self, mut document: Document) -> ClassificationOutcome {
        let outcome = if self.fail {
            document.fail("Error classifying page 1: model timed out");
            ClassificationOutcome::Failed {
                document,
                detail: "model timed out".to_string(),
            }
        } else {
            for page in document.pages.iter_mut() {
                page.classify("invoice".to_string(), 0.95);
            }
            ClassificationOutcome::Classified(document)
        };

        self.returned
            .lock()
            .unwrap()
            .push(outcome.document().clone());
        outcome
    }
}
