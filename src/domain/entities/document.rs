use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::{Page, Section};
use crate::domain::value_objects::DocumentStatus;

/// A document flowing through the processing pipeline.
///
/// Fields this service does not own are kept in `extra` so the document
/// handed to the next stage carries everything the previous stage produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_bucket: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub num_pages: usize,
    #[serde(default, with = "page_map")]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub metering: Map<String, Value>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution_arn: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input_bucket: None,
            input_key: None,
            output_bucket: None,
            status: DocumentStatus::default(),
            num_pages: 0,
            pages: Vec::new(),
            sections: Vec::new(),
            metering: Map::new(),
            errors: Vec::new(),
            workflow_execution_arn: None,
            extra: Map::new(),
        }
    }

    #[cfg(test)]
    pub fn with_pages(mut self, pages: Vec<Page>) -> Self {
        self.num_pages = pages.len();
        self.pages = pages;
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn has_pages(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Key the tracking store indexes documents by.
    pub fn object_key(&self) -> &str {
        self.input_key.as_deref().unwrap_or(&self.id)
    }

    pub fn set_status(&mut self, status: DocumentStatus) {
        self.status = status;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = DocumentStatus::Failed;
        self.errors.push(error.into());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.errors.last().map(String::as_str)
    }

    /// Adds `count` to the numeric `field` of the metering entry for `key`.
    pub fn add_metering(&mut self, key: &str, field: &str, count: u64) {
        let entry = self
            .metering
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }

        if let Value::Object(usage) = entry {
            let current = usage.get(field).and_then(Value::as_u64).unwrap_or(0);
            usage.insert(field.to_string(), Value::from(current + count));
        }
    }
}

/// Pages travel as an object keyed by page id; a plain list is accepted too.
/// In memory they are kept in page order.
mod page_map {
    use std::collections::BTreeMap;

    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::entities::Page;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PagesRepr {
        Keyed(BTreeMap<String, Page>),
        Listed(Vec<Page>),
    }

    pub fn serialize<S>(pages: &[Page], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(pages.len()))?;
        for page in pages {
            map.serialize_entry(&page.page_id, page)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Page>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut pages: Vec<Page> = match PagesRepr::deserialize(deserializer)? {
            PagesRepr::Keyed(map) => map
                .into_iter()
                .map(|(id, mut page)| {
                    if page.page_id.is_empty() {
                        page.page_id = id;
                    }
                    page
                })
                .collect(),
            PagesRepr::Listed(list) => list,
        };

        pages.sort_by_key(page_order);
        Ok(pages)
    }

    // Numeric ids first in numeric order ("2" before "10"), anything else after.
    fn page_order(page: &Page) -> (u8, u64, String) {
        match page.page_id.parse::<u64>() {
            Ok(number) => (0, number, String::new()),
            Err(_) => (1, 0, page.page_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> Value {
        json!({
            "id": "invoices/acme.pdf",
            "input_bucket": "input",
            "input_key": "invoices/acme.pdf",
            "output_bucket": "output",
            "status": "OCR",
            "num_pages": 3,
            "pages": {
                "10": {"page_id": "10", "image_uri": "s3://output/acme/pages/10/image.jpg"},
                "2": {"page_id": "2", "image_uri": "s3://output/acme/pages/2/image.jpg"},
                "1": {"image_uri": "s3://output/acme/pages/1/image.jpg", "tables": []}
            },
            "sections": [],
            "metering": {"OCR/textract/detect_document_text": {"pages": 3}},
            "errors": [],
            "evaluation_status": "PENDING"
        })
    }

    #[test]
    fn test_document_deserialization_orders_pages() {
        let document: Document = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(document.id, "invoices/acme.pdf");
        assert_eq!(document.status, DocumentStatus::Ocr);
        assert_eq!(document.page_count(), 3);

        let ids: Vec<&str> = document.pages.iter().map(|p| p.page_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "10"]);

        // Page id filled from the map key when the page omits it.
        assert_eq!(document.pages[0].page_id, "1");
        assert!(document.pages[0].extra.contains_key("tables"));
        assert_eq!(
            document.extra.get("evaluation_status"),
            Some(&json!("PENDING"))
        );
    }

    #[test]
    fn test_document_accepts_page_list() {
        let document: Document = serde_json::from_value(json!({
            "id": "doc-1",
            "pages": [
                {"page_id": "2"},
                {"page_id": "1"}
            ]
        }))
        .unwrap();

        assert_eq!(document.status, DocumentStatus::Queued);
        assert_eq!(document.pages[0].page_id, "1");
        assert_eq!(document.pages[1].page_id, "2");
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let document: Document = serde_json::from_value(sample_json()).unwrap();
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["evaluation_status"], json!("PENDING"));
        assert_eq!(value["pages"]["1"]["tables"], json!([]));
        assert_eq!(value["pages"]["10"]["page_id"], json!("10"));
        assert_eq!(value["status"], json!("OCR"));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_value::<Document>(json!({"pages": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_fail_records_error() {
        let mut document = Document::new("doc-1");
        document.fail("something broke");

        assert_eq!(document.status, DocumentStatus::Failed);
        assert_eq!(document.last_error(), Some("something broke"));
    }

    #[test]
    fn test_object_key_prefers_input_key() {
        let mut document = Document::new("doc-1");
        assert_eq!(document.object_key(), "doc-1");

        document.input_key = Some("folder/doc-1.pdf".to_string());
        assert_eq!(document.object_key(), "folder/doc-1.pdf");
    }

    #[test]
    fn test_add_metering_accumulates() {
        let mut document = Document::new("doc-1");
        document.add_metering("Classification/sagemaker/udop", "invocations", 2);
        document.add_metering("Classification/sagemaker/udop", "invocations", 3);

        assert_eq!(
            document.metering["Classification/sagemaker/udop"]["invocations"],
            json!(5)
        );
    }
}
