use async_trait::async_trait;
use reqwest::Client;
use std::env;
use thiserror::Error;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, GenerationRequest, Provider, ProviderRouting,
};
use crate::config::PlannerConfig;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    #[error("No response choices received from API")]
    NoChoices,
}

impl ApiConnectionError {
    /// Transient failures (network, rate limiting, upstream 5xx) that a caller may retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiConnectionError::NetworkError(_) => true,
            ApiConnectionError::ApiError { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

/// The single backend call type: structured JSON generation.
///
/// Returns the raw text payload; parsing and validation belong to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_json(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ApiConnectionError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn generate_json(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ApiConnectionError> {
        (**self).generate_json(request).await
    }
}

impl Provider {
    pub fn openrouter(config: &PlannerConfig) -> Self {
        Self::OpenRouter {
            api_key: config.api_key_env_var.clone(),
            base_url: config.api_base_url.clone(),
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
            only_providers: config.only_providers.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: Client::new(),
        }
    }

    pub async fn call_chat_completion(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                base_url,
                site_url,
                app_name,
                only_providers,
                temperature,
                max_tokens,
                client,
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var_name.clone()))?;

                if request.temperature.is_none() {
                    request.temperature = *temperature;
                }
                if request.max_tokens.is_none() {
                    request.max_tokens = *max_tokens;
                }
                if request.provider.is_none() && !only_providers.is_empty() {
                    request.provider = Some(ProviderRouting {
                        only: only_providers.clone(),
                    });
                }

                let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
                tracing::debug!(%url, model = %request.model, "sending chat completion request");

                let response = client
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("Content-Type", "application/json")
                    .header("HTTP-Referer", site_url.as_str())
                    .header("X-Title", app_name.as_str())
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let body = response.text().await?;
                    let chat_response = serde_json::from_str::<ChatCompletionResponse>(&body)?;
                    Ok(chat_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    tracing::warn!(%status, "chat completion request rejected");
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}

#[async_trait]
impl TextGenerator for Provider {
    async fn generate_json(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ApiConnectionError> {
        let response = self
            .call_chat_completion(request.clone().into_chat_request())
            .await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                total_tokens = usage.total_tokens,
                "chat completion usage"
            );
        }
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(ApiConnectionError::NoChoices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_and_server_errors_are_retryable() {
        let throttled = ApiConnectionError::ApiError {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            error_body: String::new(),
        };
        let unavailable = ApiConnectionError::ApiError {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            error_body: String::new(),
        };
        let unauthorized = ApiConnectionError::ApiError {
            status: reqwest::StatusCode::UNAUTHORIZED,
            error_body: String::new(),
        };
        assert!(throttled.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!unauthorized.is_retryable());
        assert!(!ApiConnectionError::MissingApiKey("X".to_string()).is_retryable());
        assert!(!ApiConnectionError::NoChoices.is_retryable());
        let undecodable =
            serde_json::from_str::<ChatCompletionResponse>("{\"unexpected\":true}").unwrap_err();
        assert!(!ApiConnectionError::SerializationError(undecodable).is_retryable());
    }
}
