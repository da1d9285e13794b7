use std::sync::Arc;
use std::time::Duration;

use tutordesk_core::dataset::{DatasetError, FallbackDataset};
use url::Url;

use crate::pipeline::Pipeline;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TUTORDESK_AI_BASE_URL is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("TUTORDESK_AI_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Connection settings for the external AI provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Option<Duration>,
}

impl ProviderConfig {
    /// `Ok(None)` when the base URL or API key is missing: the service then
    /// runs in demo mode and serves fallback data for every operation.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let (Some(base_url), Some(api_key)) = (
            non_empty("TUTORDESK_AI_BASE_URL"),
            non_empty("TUTORDESK_AI_API_KEY"),
        ) else {
            return Ok(None);
        };

        let mut base_url = Url::parse(&base_url)?;
        // Url::join drops the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let timeout = match non_empty("TUTORDESK_AI_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => None,
        };

        Ok(Some(ProviderConfig {
            base_url,
            api_key,
            timeout,
        }))
    }
}

/// Built-in dataset unless `TUTORDESK_FALLBACK_DATASET` names a JSON file.
pub fn load_dataset() -> Result<FallbackDataset, ConfigError> {
    match std::env::var("TUTORDESK_FALLBACK_DATASET") {
        Ok(path) if !path.trim().is_empty() => {
            Ok(FallbackDataset::from_json_file(path.trim())?)
        }
        _ => Ok(FallbackDataset::builtin()),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}
