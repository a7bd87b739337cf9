use tracing_subscriber::EnvFilter;

use crate::infrastructure::settings::HandlerSettings;

/// Log targets that follow the model client level instead of the global one.
const MODEL_CLIENT_TARGETS: &[&str] = &[
    "idp_classify::infrastructure::external_services::model_backends",
    "aws_sdk_sagemakerruntime",
];

#[derive(Debug)]
pub struct TelemetryError(String);

impl std::fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to initialize tracing: {}", self.0)
    }
}

impl std::error::Error for TelemetryError {}

/// Maps the level names used across the pipeline (including `WARNING` and
/// `CRITICAL`) onto tracing levels. Unknown names fall back to `info`.
pub fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" | "FATAL" => "error",
        "OFF" | "NONE" => "off",
        _ => "info",
    }
}

pub fn filter_directives(log_level: &str, model_client_log_level: &str) -> String {
    let model_level = normalize_level(model_client_log_level);
    let mut directives = vec![normalize_level(log_level).to_string()];
    directives.extend(
        MODEL_CLIENT_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, model_level)),
    );
    directives.join(",")
}

/// Installs the JSON subscriber CloudWatch ingests. Lambda stamps every line
/// itself, so no timestamp is written.
pub fn init_tracing(settings: &HandlerSettings) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(filter_directives(
        &settings.log_level,
        &settings.model_client_log_level,
    ))
    .map_err(|e| TelemetryError(e.to_string()))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_target(true)
        .without_time()
        .try_init()
        .map_err(|e| TelemetryError(e.to_string()))
}
