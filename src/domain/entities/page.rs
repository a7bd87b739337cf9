use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_confidence() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub page_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_text_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_confidence_uri: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Fields owned by other pipeline stages (tables, forms, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            image_uri: None,
            raw_text_uri: None,
            parsed_text_uri: None,
            text_confidence_uri: None,
            classification: None,
            confidence: default_confidence(),
            extra: Map::new(),
        }
    }

    #[cfg(test)]
    pub fn with_image_uri(mut self, image_uri: impl Into<String>) -> Self {
        self.image_uri = Some(image_uri.into());
        self
    }

    pub fn classify(&mut self, classification: String, confidence: f64) {
        self.classification = Some(classification);
        self.confidence = confidence;
    }
}
