pub mod config_provider;
pub mod document_classifier;
pub mod document_sync;
pub mod metrics_sink;
pub mod model_backend;

pub use config_provider::ConfigProvider;
pub use document_classifier::{ClassifierFactory, DocumentClassifier};
pub use document_sync::DocumentSync;
pub use metrics_sink::MetricsSink;
pub use model_backend::ModelBackend;
