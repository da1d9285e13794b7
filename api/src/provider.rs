use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tutordesk_core::dataset::FallbackDataset;
use tutordesk_core::operations::{OperationKind, OperationOutput, ValidatedInput};
use url::Url;

use crate::state::ProviderConfig;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("AI provider is not configured")]
    NotConfigured,
    #[error("AI provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("AI provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI provider returned malformed output: {0}")]
    MalformedResponse(String),
    #[error("invalid AI provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, ProviderError>> + Send + 'a>>;

/// External AI generation capability. Opaque and fallible.
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &str;

    fn is_configured(&self) -> bool {
        true
    }

    fn invoke(&self, operation: OperationKind, payload: serde_json::Value) -> ProviderFuture<'_>;
}

/// Calls `POST {base_url}/flows/{operation}` with a bearer key.
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(HttpProvider {
            client: builder.build()?,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    fn flow_url(&self, operation: OperationKind) -> Result<Url, ProviderError> {
        Ok(self.base_url.join(&format!("flows/{}", operation.as_str()))?)
    }
}

impl AiProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn invoke(&self, operation: OperationKind, payload: serde_json::Value) -> ProviderFuture<'_> {
        Box::pin(async move {
            let url = self.flow_url(operation)?;
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|err| ProviderError::MalformedResponse(err.to_string()))
        })
    }
}

/// Stand-in when no credentials are configured: every call fails, so every
/// operation serves fallback data.
pub struct UnconfiguredProvider;

impl AiProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn is_configured(&self) -> bool {
        false
    }

    fn invoke(&self, _operation: OperationKind, _payload: serde_json::Value) -> ProviderFuture<'_> {
        Box::pin(async { Err(ProviderError::NotConfigured) })
    }
}

pub fn build_provider(config: Option<ProviderConfig>) -> Result<Arc<dyn AiProvider>, ProviderError> {
    match config {
        Some(config) => Ok(Arc::new(HttpProvider::new(config)?)),
        None => Ok(Arc::new(UnconfiguredProvider)),
    }
}

/// Thin adapter between validated input and the provider.
///
/// Builds the operation's payload and checks the response against the
/// operation's output schema. Errors are returned, never handled here.
#[derive(Clone)]
pub struct ProviderInvoker {
    provider: Arc<dyn AiProvider>,
}

impl ProviderInvoker {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        ProviderInvoker { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    pub async fn invoke(
        &self,
        input: &ValidatedInput,
        dataset: &FallbackDataset,
    ) -> Result<OperationOutput, ProviderError> {
        let kind = input.kind();
        let value = self
            .provider
            .invoke(kind, input.provider_payload(dataset))
            .await?;
        OperationOutput::parse(kind, value)
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))
    }
}
