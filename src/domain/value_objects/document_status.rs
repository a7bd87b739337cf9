use serde::{Deserialize, Serialize};

/// Lifecycle status of a document as it moves through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Queued,
    Running,
    Ocr,
    Classifying,
    Extracting,
    Assessing,
    Postprocessing,
    Summarizing,
    Evaluating,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Queued => "QUEUED",
            DocumentStatus::Running => "RUNNING",
            DocumentStatus::Ocr => "OCR",
            DocumentStatus::Classifying => "CLASSIFYING",
            DocumentStatus::Extracting => "EXTRACTING",
            DocumentStatus::Assessing => "ASSESSING",
            DocumentStatus::Postprocessing => "POSTPROCESSING",
            DocumentStatus::Summarizing => "SUMMARIZING",
            DocumentStatus::Evaluating => "EVALUATING",
            DocumentStatus::Completed => "COMPLETED",
            DocumentStatus::Failed => "FAILED",
        }
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Queued
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
