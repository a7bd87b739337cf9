use async_trait::async_trait;
use aws_sdk_sagemakerruntime::Client;
use aws_sdk_sagemakerruntime::error::DisplayErrorContext;
use aws_sdk_sagemakerruntime::primitives::Blob;

use super::parse_prediction;
use crate::application::ports::ModelBackend;
use crate::application::ports::model_backend::{
    BackendKind, ModelBackendError, PageClassificationRequest, PagePrediction,
};

const CONTENT_TYPE: &str = "application/json";

/// Invokes the page classifier hosted on a SageMaker endpoint. Throttling
/// retries are left to the SDK's retry policy.
#[derive(Debug, Clone)]
pub struct SageMakerBackend {
    client: Client,
    endpoint_name: String,
}

impl SageMakerBackend {
    pub fn new(client: Client, endpoint_name: impl Into<String>) -> Self {
        Self {
            client,
            endpoint_name: endpoint_name.into(),
        }
    }
}

#[async_trait]
impl ModelBackend for SageMakerBackend {
    async fn classify_page(
        &self,
        request: &PageClassificationRequest,
    ) -> Result<PagePrediction, ModelBackendError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ModelBackendError::InvalidInput(e.to_string()))?;

        tracing::debug!(
            endpoint = %self.endpoint_name,
            image = %request.input_image,
            "Invoking SageMaker endpoint"
        );

        let output = self
            .client
            .invoke_endpoint()
            .endpoint_name(&self.endpoint_name)
            .content_type(CONTENT_TYPE)
            .accept(CONTENT_TYPE)
            .body(Blob::new(payload))
            .send()
            .await
            .map_err(|e| ModelBackendError::ApiError(DisplayErrorContext(&e).to_string()))?;

        let body: &[u8] = output.body().map(|blob| blob.as_ref()).unwrap_or_default();
        parse_prediction(body)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::SageMaker
    }
}
