//! Generative service providers
//!
//! Thin clients for the two remote services the pipelines depend on: an
//! OpenAI-compatible chat-completions endpoint for text, and an image endpoint
//! (see [`image`]). Clients surface [`ServiceError`] so the retry executor can
//! classify each failure; they never retry on their own.

use crate::error::{ApiError, ServiceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod fetch;
pub mod image;

pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use image::{GeneratedImage, ImageBackend, ImageProvider, ImageProviderFactory};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Overrides the client's default model for this call
    pub model: Option<String>,
    pub temperature: Option<f32>,       // 0.0-2.0
    pub top_p: Option<f32>,             // Nucleus sampling
    pub frequency_penalty: Option<f32>, // -2.0 to 2.0
    pub presence_penalty: Option<f32>,  // -2.0 to 2.0
}

impl CompletionOptions {
    /// Sampling used for factual lookups (industry, location, keywords).
    pub fn precise() -> Self {
        Self::sampled(0.2, 0.1)
    }

    /// Sampling used for copywriting and image descriptions.
    pub fn creative() -> Self {
        Self::sampled(0.7, 0.8)
    }

    pub fn sampled(temperature: f32, top_p: f32) -> Self {
        Self {
            model: None,
            temperature: Some(temperature),
            top_p: Some(top_p),
            frequency_penalty: Some(0.0),
            presence_penalty: Some(0.0),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::sampled(0.5, 0.5)
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

/// Text-generation client
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a completion from an ordered list of messages
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ServiceError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Get the default model name
    fn model_name(&self) -> &str;
}

// OpenAI-compatible API request/response structures
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn build_provider_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

/// Read an error body and classify the status.
pub(crate) async fn status_error(response: reqwest::Response) -> ServiceError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ServiceError::from_status(status, body)
}

/// OpenAI chat-completions client
pub struct OpenAIClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(model: String, api_key: String, base_url: Option<String>) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        let base_url = base_url
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            model,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl TextProvider for OpenAIClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ServiceError> {
        let request = ChatCompletionRequest {
            model: options.model.as_deref().unwrap_or(&self.model),
            messages: &messages,
            temperature: options.temperature,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Api(format!("Failed to parse response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Api("No choices in response".to_string()))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            model: completion.model,
            usage: completion.usage.unwrap_or_default(),
        })
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// Mock provider for testing
#[cfg(test)]
type Responder = dyn Fn(&[ChatMessage]) -> Result<String, ServiceError> + Send + Sync;

/// Answers each request by inspecting its messages.
#[cfg(test)]
pub struct MockProvider {
    respond: Box<Responder>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockProvider {
    pub fn new(
        respond: impl Fn(&[ChatMessage]) -> Result<String, ServiceError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl TextProvider for MockProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ServiceError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let content = (self.respond)(&messages)?;
        Ok(CompletionResponse {
            content,
            model: options.model.unwrap_or_else(|| "mock".to_string()),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            },
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAIClient {
        OpenAIClient::new(
            "gpt-3.5-turbo".to_string(),
            "test-key".to_string(),
            Some(format!("{}/v1/", server.uri())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn complete_parses_content_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo-16k",
                "messages": [{"role": "user", "content": "hello"}],
                "temperature": 0.7
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "model": "gpt-3.5-turbo-16k",
                "choices": [{"message": {"role": "assistant", "content": "hi there"}}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
            })))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .complete(
                vec![ChatMessage::user("hello")],
                CompletionOptions::creative().with_model("gpt-3.5-turbo-16k"),
            )
            .await
            .unwrap();

        assert_eq!(response.content, "hi there");
        assert_eq!(response.model, "gpt-3.5-turbo-16k");
        assert_eq!(response.usage.total_tokens, 5);
    }

    #[tokio::test]
    async fn complete_classifies_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete(vec![ChatMessage::user("hello")], CompletionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::RateLimited("slow down".to_string()));
    }

    #[tokio::test]
    async fn complete_rejects_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gpt-3.5-turbo",
                "choices": []
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete(vec![ChatMessage::user("hello")], CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Api(_)));
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        let serialized = serde_json::to_value(ChatMessage::system("persona")).unwrap();
        assert_eq!(serialized, json!({"role": "system", "content": "persona"}));
    }
}
