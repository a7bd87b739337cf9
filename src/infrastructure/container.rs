use aws_config::{BehaviorVersion, Region};
use std::sync::Arc;

use crate::{
    application::{
        ports::{ClassifierFactory, ConfigProvider, DocumentSync, MetricsSink},
        use_cases::ClassifyDocumentUseCase,
    },
    infrastructure::{
        external_services::{
            AppSyncConfig, AppSyncDocumentSync, EmfMetricsSink, JsonConfigProvider,
            ModelClassifierFactory,
        },
        settings::HandlerSettings,
    },
    presentation::lambda::ClassificationHandler,
};

/// Everything built once per container at cold start.
pub struct AppContainer {
    // Lambda Handlers
    pub classification_handler: Arc<ClassificationHandler>,
}

impl AppContainer {
    pub async fn new(
        settings: &HandlerSettings,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        // Create external services
        let document_sync: Arc<dyn DocumentSync> =
            Arc::new(AppSyncDocumentSync::new(AppSyncConfig::new(
                settings.appsync_api_url.as_str(),
                settings.appsync_api_key.clone(),
            ))?);

        let metrics_sink: Arc<dyn MetricsSink> =
            Arc::new(EmfMetricsSink::stdout(settings.metric_namespace.clone()));

        let config_provider: Arc<dyn ConfigProvider> = Arc::new(JsonConfigProvider::new(
            settings.configuration_path.clone(),
            settings.inline_configuration.clone(),
        ));

        let classifier_factory: Arc<dyn ClassifierFactory> =
            Arc::new(ModelClassifierFactory::new(sdk_config));

        // Create use cases
        let classify_document_use_case = Arc::new(ClassifyDocumentUseCase::new(
            document_sync,
            metrics_sink,
            config_provider,
            classifier_factory,
            settings.use_case_options(),
        ));

        // Create handlers
        let classification_handler =
            Arc::new(ClassificationHandler::new(classify_document_use_case));

        tracing::info!(
            region = %settings.region,
            max_workers = settings.max_workers,
            endpoint = %settings.endpoint_name,
            "Container initialized"
        );

        Ok(Self {
            classification_handler,
        })
    }
}
