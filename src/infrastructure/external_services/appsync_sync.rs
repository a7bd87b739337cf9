use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::DocumentSync;
use crate::application::ports::document_sync::DocumentSyncError;
use crate::domain::entities::Document;

const UPDATE_DOCUMENT_MUTATION: &str = r#"
mutation UpdateDocument($input: UpdateDocumentInput!) {
  updateDocument(input: $input) {
    ObjectKey
    ObjectStatus
  }
}
"#;

#[derive(Debug, Clone)]
pub struct AppSyncConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl AppSyncConfig {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateDocumentInput {
    object_key: String,
    object_status: String,
    page_count: usize,
    pages: Vec<PageInput>,
    sections: Vec<SectionInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workflow_execution_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PageInput {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_uri: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SectionInput {
    id: String,
    page_ids: Vec<String>,
    class: String,
    #[serde(rename = "OutputJSONUri", skip_serializing_if = "Option::is_none")]
    output_json_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl UpdateDocumentInput {
    fn from_document(document: &Document) -> Result<Self, DocumentSyncError> {
        let metering = if document.metering.is_empty() {
            None
        } else {
            Some(
                serde_json::to_string(&document.metering)
                    .map_err(|e| DocumentSyncError::SerializationError(e.to_string()))?,
            )
        };

        Ok(Self {
            object_key: document.object_key().to_string(),
            object_status: document.status.to_string(),
            page_count: document.page_count(),
            pages: document
                .pages
                .iter()
                .map(|page| PageInput {
                    id: page.page_id.clone(),
                    class: page.classification.clone(),
                    image_uri: page.image_uri.clone(),
                    text_uri: page
                        .parsed_text_uri
                        .clone()
                        .or_else(|| page.raw_text_uri.clone()),
                })
                .collect(),
            sections: document
                .sections
                .iter()
                .map(|section| SectionInput {
                    id: section.section_id.clone(),
                    page_ids: section.page_ids.clone(),
                    class: section.classification.clone(),
                    output_json_uri: section.extraction_result_uri.clone(),
                })
                .collect(),
            metering,
            workflow_execution_arn: document.workflow_execution_arn.clone(),
            error_message: document.last_error().map(str::to_string),
        })
    }
}

/// Publishes document state through the tracking API's `updateDocument`
/// GraphQL mutation.
#[derive(Debug, Clone)]
pub struct AppSyncDocumentSync {
    client: Client,
    config: AppSyncConfig,
}

impl AppSyncDocumentSync {
    pub fn new(config: AppSyncConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl DocumentSync for AppSyncDocumentSync {
    async fn update_document(&self, document: &Document) -> Result<(), DocumentSyncError> {
        let input = UpdateDocumentInput::from_document(document)?;
        let body = serde_json::json!({
            "query": UPDATE_DOCUMENT_MUTATION,
            "variables": { "input": input },
        });

        let mut request = self.client.post(&self.config.api_url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DocumentSyncError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DocumentSyncError::NetworkError(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(DocumentSyncError::ApiError(format!(
                "status {}: {}",
                status, text
            )));
        }

        let parsed: GraphQlResponse = serde_json::from_str(&text)
            .map_err(|e| DocumentSyncError::SerializationError(e.to_string()))?;

        if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(DocumentSyncError::ApiError(messages.join("; ")));
        }

        tracing::debug!(
            object_key = document.object_key(),
            status = %document.status,
            "Document update published"
        );
        Ok(())
    }
}
