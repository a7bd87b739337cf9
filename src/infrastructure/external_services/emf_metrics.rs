use async_trait::async_trait;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Mutex;

use crate::application::ports::MetricsSink;
use crate::application::ports::metrics_sink::{MetricUnit, MetricsError};

pub const SERVICE_DIMENSION: &str = "Service";
pub const SERVICE_NAME: &str = "Classification";

/// Emits metrics as CloudWatch Embedded Metric Format lines. The Lambda log
/// pipeline turns each line into a metric datapoint.
pub struct EmfMetricsSink {
    namespace: String,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl EmfMetricsSink {
    pub fn stdout(namespace: impl Into<String>) -> Self {
        Self::with_writer(namespace, Box::new(std::io::stdout()))
    }

    pub fn with_writer(namespace: impl Into<String>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            namespace: namespace.into(),
            writer: Mutex::new(writer),
        }
    }

    fn render(&self, name: &str, value: f64, unit: MetricUnit, timestamp_ms: i64) -> Value {
        let mut record = json!({
            "_aws": {
                "Timestamp": timestamp_ms,
                "CloudWatchMetrics": [{
                    "Namespace": self.namespace,
                    "Dimensions": [[SERVICE_DIMENSION]],
                    "Metrics": [{"Name": name, "Unit": unit.as_str()}]
                }]
            },
            SERVICE_DIMENSION: SERVICE_NAME,
        });

        if let Value::Object(fields) = &mut record {
            fields.insert(name.to_string(), json!(value));
        }
        record
    }
}

#[async_trait]
impl MetricsSink for EmfMetricsSink {
    async fn put_metric(
        &self,
        name: &str,
        value: f64,
        unit: MetricUnit,
    ) -> Result<(), MetricsError> {
        let record = self.render(name, value, unit, chrono::Utc::now().timestamp_millis());
        let line = serde_json::to_string(&record)
            .map_err(|e| MetricsError::SerializationError(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| MetricsError::WriteError(e.to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| MetricsError::WriteError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| MetricsError::WriteError(e.to_string()))?;

        tracing::debug!(metric = name, value, "Metric emitted");
        Ok(())
    }
}
