pub mod appsync_sync;
pub mod classifier_factory;
pub mod emf_metrics;
pub mod json_config_provider;
pub mod model_backends;

pub use appsync_sync::{AppSyncConfig, AppSyncDocumentSync};
pub use classifier_factory::ModelClassifierFactory;
pub use emf_metrics::EmfMetricsSink;
pub use json_config_provider::JsonConfigProvider;
