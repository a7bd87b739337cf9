use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A run of consecutive pages that share one document class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_id: String,
    pub classification: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub page_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_result_uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_confidence() -> f64 {
    1.0
}

impl Section {
    pub fn new(section_id: impl Into<String>, classification: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            classification: classification.into(),
            confidence: default_confidence(),
            page_ids: Vec::new(),
            extraction_result_uri: None,
            extra: Map::new(),
        }
    }

    pub fn push_page(&mut self, page_id: &str, confidence: f64) {
        self.page_ids.push(page_id.to_string());
        self.confidence = self.confidence.min(confidence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_tracks_lowest_confidence() {
        let mut section = Section::new("1", "invoice");
        section.push_page("1", 0.9);
        section.push_page("2", 0.75);
        section.push_page("3", 0.8);

        assert_eq!(section.page_ids, vec!["1", "2", "3"]);
        assert_eq!(section.confidence, 0.75);
    }
}
