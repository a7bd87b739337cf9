pub mod sagemaker;

pub use sagemaker::SageMakerBackend;

use crate::application::ports::model_backend::{ModelBackendError, PagePrediction};

/// Decodes the JSON body returned by the model endpoint.
pub fn parse_prediction(body: &[u8]) -> Result<PagePrediction, ModelBackendError> {
    if body.is_empty() {
        return Err(ModelBackendError::ParseError(
            "model returned an empty body".to_string(),
        ));
    }

    serde_json::from_slice::<PagePrediction>(body)
        .map_err(|e| ModelBackendError::ParseError(e.to_string()))
}
