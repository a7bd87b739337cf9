use async_trait::async_trait;

#[derive(Debug)]
pub enum MetricsError {
    WriteError(String),
    SerializationError(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::WriteError(msg) => write!(f, "Metric write error: {}", msg),
            MetricsError::SerializationError(msg) => {
                write!(f, "Metric serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Count,
    Milliseconds,
}

impl MetricUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::Count => "Count",
            MetricUnit::Milliseconds => "Milliseconds",
        }
    }
}

#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn put_metric(&self, name: &str, value: f64, unit: MetricUnit)
    -> Result<(), MetricsError>;
}
