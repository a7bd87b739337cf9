use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

use crate::application::use_cases::ClassifyDocumentOptions;

pub const DEFAULT_MAX_WORKERS: usize = 20;
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_METRIC_NAMESPACE: &str = "IDP";

static ENDPOINT_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9](-*[a-zA-Z0-9]){0,62}$").expect("endpoint name pattern is valid")
});

#[derive(Debug)]
pub enum SettingsError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Missing(key) => {
                write!(f, "Missing required environment variable: {}", key)
            }
            SettingsError::Invalid { key, reason } => {
                write!(f, "Invalid value for {}: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Process-wide settings read from the environment once at cold start.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerSettings {
    pub region: String,
    pub max_workers: usize,
    pub endpoint_name: String,
    pub log_level: String,
    pub model_client_log_level: String,
    pub appsync_api_url: Url,
    pub appsync_api_key: Option<String>,
    pub configuration_path: Option<PathBuf>,
    pub inline_configuration: Option<String>,
    pub metric_namespace: String,
}

impl HandlerSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        // Local runs keep their variables in a .env file.
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let region = get("AWS_REGION").ok_or(SettingsError::Missing("AWS_REGION"))?;

        let max_workers = match get("MAX_WORKERS") {
            Some(raw) => parse_max_workers(&raw)?,
            None => DEFAULT_MAX_WORKERS,
        };

        let endpoint_name = get("SAGEMAKER_ENDPOINT_NAME")
            .ok_or(SettingsError::Missing("SAGEMAKER_ENDPOINT_NAME"))?;
        if !ENDPOINT_NAME_PATTERN.is_match(&endpoint_name) {
            return Err(SettingsError::Invalid {
                key: "SAGEMAKER_ENDPOINT_NAME",
                reason: format!("'{}' is not a valid endpoint name", endpoint_name),
            });
        }

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let model_client_log_level = get("MODEL_CLIENT_LOG_LEVEL")
            .or_else(|| get("BEDROCK_LOG_LEVEL"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let raw_url = get("APPSYNC_API_URL").ok_or(SettingsError::Missing("APPSYNC_API_URL"))?;
        let appsync_api_url = Url::parse(&raw_url).map_err(|e| SettingsError::Invalid {
            key: "APPSYNC_API_URL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            region,
            max_workers,
            endpoint_name,
            log_level,
            model_client_log_level,
            appsync_api_url,
            appsync_api_key: get("APPSYNC_API_KEY"),
            configuration_path: get("CONFIGURATION_PATH").map(PathBuf::from),
            inline_configuration: get("CONFIGURATION"),
            metric_namespace: get("METRIC_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_METRIC_NAMESPACE.to_string()),
        })
    }

    pub fn use_case_options(&self) -> ClassifyDocumentOptions {
        ClassifyDocumentOptions {
            region: self.region.clone(),
            max_workers: self.max_workers,
            endpoint_name: self.endpoint_name.clone(),
        }
    }
}

fn parse_max_workers(raw: &str) -> Result<usize, SettingsError> {
    let invalid = |reason: String| SettingsError::Invalid {
        key: "MAX_WORKERS",
        reason,
    };

    let workers = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| invalid(format!("'{}': {}", raw, e)))?;

    if workers == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }

    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("AWS_REGION", "us-east-1"),
        ("SAGEMAKER_ENDPOINT_NAME", "udop-classifier-1"),
        ("APPSYNC_API_URL", "https://example.appsync-api.us-east-1.amazonaws.com/graphql"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut vars = REQUIRED.to_vec();
        vars.extend_from_slice(extra);
        vars
    }

    #[test]
    fn test_defaults() {
        let settings = HandlerSettings::from_lookup(lookup(REQUIRED)).unwrap();

        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.max_workers, DEFAULT_MAX_WORKERS);
        assert_eq!(settings.endpoint_name, "udop-classifier-1");
        assert_eq!(settings.log_level, "INFO");
        assert_eq!(settings.model_client_log_level, "INFO");
        assert_eq!(settings.metric_namespace, "IDP");
        assert_eq!(settings.appsync_api_key, None);
        assert_eq!(settings.configuration_path, None);
    }

    #[test]
    fn test_overrides() {
        let vars = with(&[
            ("MAX_WORKERS", "5"),
            ("LOG_LEVEL", "DEBUG"),
            ("BEDROCK_LOG_LEVEL", "WARNING"),
            ("APPSYNC_API_KEY", "da2-secret"),
            ("CONFIGURATION_PATH", "/opt/config.json"),
            ("METRIC_NAMESPACE", "Custom"),
        ]);
        let settings = HandlerSettings::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(settings.max_workers, 5);
        assert_eq!(settings.log_level, "DEBUG");
        assert_eq!(settings.model_client_log_level, "WARNING");
        assert_eq!(settings.appsync_api_key.as_deref(), Some("da2-secret"));
        assert_eq!(
            settings.configuration_path,
            Some(PathBuf::from("/opt/config.json"))
        );
        assert_eq!(settings.metric_namespace, "Custom");

        let options = settings.use_case_options();
        assert_eq!(options.max_workers, 5);
        assert_eq!(options.endpoint_name, "udop-classifier-1");
    }

    #[test]
    fn test_model_client_level_prefers_new_name() {
        let vars = with(&[
            ("MODEL_CLIENT_LOG_LEVEL", "ERROR"),
            ("BEDROCK_LOG_LEVEL", "DEBUG"),
        ]);
        let settings = HandlerSettings::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(settings.model_client_log_level, "ERROR");
    }

    #[test]
    fn test_missing_required_values() {
        let result = HandlerSettings::from_lookup(lookup(&[("AWS_REGION", "us-east-1")]));
        assert!(matches!(
            result,
            Err(SettingsError::Missing("SAGEMAKER_ENDPOINT_NAME"))
        ));

        let result = HandlerSettings::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(SettingsError::Missing("AWS_REGION"))));
    }

    #[test]
    fn test_invalid_max_workers() {
        for raw in ["zero", "0", "-3"] {
            let vars = with(&[("MAX_WORKERS", raw)]);
            let result = HandlerSettings::from_lookup(lookup(&vars));
            assert!(
                matches!(result, Err(SettingsError::Invalid { key: "MAX_WORKERS", .. })),
                "accepted MAX_WORKERS={}",
                raw
            );
        }
    }

    #[test]
    fn test_invalid_endpoint_name() {
        let vars = vec![
            ("AWS_REGION", "us-east-1"),
            ("SAGEMAKER_ENDPOINT_NAME", "bad_endpoint!"),
            ("APPSYNC_API_URL", "https://example.com/graphql"),
        ];
        let result = HandlerSettings::from_lookup(lookup(&vars));
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                key: "SAGEMAKER_ENDPOINT_NAME",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_appsync_url() {
        let vars = vec![
            ("AWS_REGION", "us-east-1"),
            ("SAGEMAKER_ENDPOINT_NAME", "udop"),
            ("APPSYNC_API_URL", "not a url"),
        ];
        let result = HandlerSettings::from_lookup(lookup(&vars));
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                key: "APPSYNC_API_URL",
                ..
            })
        ));
    }
}
