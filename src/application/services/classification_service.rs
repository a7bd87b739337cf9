use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;

use crate::application::ports::ModelBackend;
use crate::application::ports::document_classifier::{
    ClassificationOutcome, ClassifierSettings, DocumentClassifier,
};
use crate::application::ports::model_backend::PageClassificationRequest;
use crate::domain::entities::{Document, Page, Section};

const DEFAULT_UNKNOWN_CLASS: &str = "unclassified";

/// Classifies every page of a document with a remote model and groups the
/// pages into sections.
pub struct ModelClassificationService {
    backend: Arc<dyn ModelBackend>,
    max_workers: usize,
    known_classes: Vec<String>,
    unknown_class: String,
}

struct PageJob {
    index: usize,
    page_id: String,
    image_uri: Option<String>,
}

struct PageResult {
    index: usize,
    page_id: String,
    invoked: bool,
    result: Result<(String, f64), String>,
}

impl ModelClassificationService {
    pub fn new(backend: Arc<dyn ModelBackend>, settings: &ClassifierSettings) -> Self {
        let classification = settings
            .config
            .get("classification")
            .and_then(Value::as_object);

        let known_classes = classification
            .and_then(|section| section.get("classes"))
            .and_then(Value::as_array)
            .map(|classes| {
                classes
                    .iter()
                    .filter_map(|class| match class {
                        Value::String(name) => Some(name.clone()),
                        Value::Object(entry) => entry
                            .get("name")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let unknown_class = classification
            .and_then(|section| section.get("unknown_class"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_UNKNOWN_CLASS)
            .to_string();

        Self {
            backend,
            max_workers: settings.max_workers.max(1),
            known_classes,
            unknown_class,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    fn metering_key(&self) -> String {
        format!("Classification/{}/udop", self.backend.kind())
    }

    async fn classify_page(&self, job: PageJob) -> PageResult {
        let Some(image_uri) = job.image_uri else {
            return PageResult {
                index: job.index,
                page_id: job.page_id,
                invoked: false,
                result: Err("page has no image_uri".to_string()),
            };
        };

        let request = PageClassificationRequest::for_image(&image_uri);
        let result = match self.backend.classify_page(&request).await {
            Ok(prediction) => {
                let label = prediction.prediction.trim();
                if label.is_empty() {
                    Err("model returned an empty prediction".to_string())
                } else {
                    let confidence = prediction.confidence.unwrap_or(1.0);
                    Ok((self.resolve_class(&job.page_id, label), confidence))
                }
            }
            Err(e) => Err(e.to_string()),
        };

        tracing::debug!(page_id = %job.page_id, ok = result.is_ok(), "Page classified");

        PageResult {
            index: job.index,
            page_id: job.page_id,
            invoked: true,
            result,
        }
    }

    fn resolve_class(&self, page_id: &str, label: &str) -> String {
        if self.known_classes.is_empty() || self.known_classes.iter().any(|c| c == label) {
            return label.to_string();
        }

        tracing::warn!(
            page_id,
            predicted = label,
            fallback = %self.unknown_class,
            "Model predicted a class that is not configured"
        );
        self.unknown_class.clone()
    }
}

/// Groups consecutive pages that share a class into sections.
pub fn build_sections(pages: &[Page]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for page in pages {
        let Some(class) = page.classification.as_deref() else {
            continue;
        };

        match sections.last_mut() {
            Some(section) if section.classification == class => {
                section.push_page(&page.page_id, page.confidence);
            }
            _ => {
                let mut section = Section::new((sections.len() + 1).to_string(), class);
                section.push_page(&page.page_id, page.confidence);
                sections.push(section);
            }
        }
    }

    sections
}

#[async_trait]
impl DocumentClassifier for ModelClassificationService {
    #[tracing::instrument(skip_all, fields(document_id = %document.id))]
    async fn classify_document(&self, mut document: Document) -> ClassificationOutcome {
        tracing::info!(
            pages = document.page_count(),
            max_workers = self.max_workers,
            backend = %self.backend.kind(),
            "Classifying document"
        );

        let jobs: Vec<PageJob> = document
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| PageJob {
                index,
                page_id: page.page_id.clone(),
                image_uri: page.image_uri.clone(),
            })
            .collect();

        let mut results: Vec<PageResult> = stream::iter(jobs)
            .map(|job| self.classify_page(job))
            .buffer_unordered(self.max_workers)
            .collect()
            .await;
        results.sort_by_key(|r| r.index);

        let invocations = results.iter().filter(|r| r.invoked).count() as u64;
        if invocations > 0 {
            document.add_metering(&self.metering_key(), "invocations", invocations);
        }

        let mut failures = Vec::new();
        for page_result in results {
            match page_result.result {
                Ok((class, confidence)) => {
                    document.pages[page_result.index].classify(class, confidence);
                }
                Err(detail) => failures.push(format!(
                    "Error classifying page {}: {}",
                    page_result.page_id, detail
                )),
            }
        }

        if !failures.is_empty() {
            tracing::error!(failed_pages = failures.len(), "Page classification failed");
            let detail = failures.join("; ");
            for failure in failures {
                document.fail(failure);
            }
            return ClassificationOutcome::Failed { document, detail };
        }

        document.sections = build_sections(&document.pages);
        document.num_pages = document.page_count();

        tracing::info!(sections = document.sections.len(), "Document classified");

        ClassificationOutcome::Classified(document)
    }
}
