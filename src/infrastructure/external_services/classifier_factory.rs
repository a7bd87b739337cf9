use aws_config::SdkConfig;
use aws_sdk_sagemakerruntime::config::{Builder as SageMakerConfigBuilder, Region};
use std::sync::Arc;

use crate::application::ports::document_classifier::{
    ClassifierError, ClassifierSettings, SAGEMAKER_ENDPOINT_KEY,
};
use crate::application::ports::model_backend::BackendKind;
use crate::application::ports::{ClassifierFactory, DocumentClassifier, ModelBackend};
use crate::application::services::ModelClassificationService;
use crate::infrastructure::external_services::model_backends::SageMakerBackend;

pub struct ModelClassifierFactory {
    sdk_config: SdkConfig,
}

impl ModelClassifierFactory {
    pub fn new(sdk_config: SdkConfig) -> Self {
        Self { sdk_config }
    }

    fn required<'a>(
        settings: &'a ClassifierSettings,
        key: &str,
    ) -> Result<&'a str, ClassifierError> {
        match settings.config_str(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            Some(_) => Err(ClassifierError::InvalidConfiguration(format!(
                "{} is empty",
                key
            ))),
            None => Err(ClassifierError::MissingConfiguration(key.to_string())),
        }
    }

    fn backend(&self, settings: &ClassifierSettings) -> Result<Arc<dyn ModelBackend>, ClassifierError> {
        match settings.backend {
            BackendKind::SageMaker => {
                let endpoint_name = Self::required(settings, SAGEMAKER_ENDPOINT_KEY)?;
                let config = SageMakerConfigBuilder::from(&self.sdk_config)
                    .region(Region::new(settings.region.clone()))
                    .build();
                let client = aws_sdk_sagemakerruntime::Client::from_conf(config);
                Ok(Arc::new(SageMakerBackend::new(client, endpoint_name)))
            }
        }
    }
}

impl ClassifierFactory for ModelClassifierFactory {
    fn create(
        &self,
        settings: ClassifierSettings,
    ) -> Result<Arc<dyn DocumentClassifier>, ClassifierError> {
        let backend = self.backend(&settings)?;
        tracing::debug!(
            backend = %settings.backend,
            region = %settings.region,
            max_workers = settings.max_workers,
            "Created classification service"
        );
        Ok(Arc::new(ModelClassificationService::new(backend, &settings)))
    }
}
