use serde::{Deserialize, Serialize};

use crate::domain::entities::Document;

/// Invocation payload produced by the OCR step of the workflow.
#[derive(Debug, Deserialize)]
pub struct ClassificationEvent {
    #[serde(rename = "OCRResult")]
    pub ocr_result: OcrResult,
}

#[derive(Debug, Deserialize)]
pub struct OcrResult {
    pub document: Document,
}

#[derive(Debug, Serialize)]
pub struct ClassificationResponse {
    pub document: Document,
}
