//! Image-generation clients.
//!
//! Two backends: the OpenAI images endpoint, which answers with a URL to fetch,
//! and a Stable Diffusion inference endpoint, which answers with raw bytes.

use crate::error::{ApiError, ServiceError};
use crate::provider::{build_provider_http_client, status_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Result of one image generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    /// Location the image must be fetched from
    Url(String),
    /// Encoded image returned inline
    Bytes(Vec<u8>),
}

/// Image-generation client
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate one image for `prompt` at `size` (e.g. `1024x1024`).
    async fn generate(&self, prompt: &str, size: &str) -> Result<GeneratedImage, ServiceError>;

    fn provider_name(&self) -> &str;
}

/// Which image service to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageBackend {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "stable-diffusion")]
    StableDiffusion,
}

/// OpenAI images endpoint client
pub struct OpenAIImageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIImageClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        let base_url = base_url
            .unwrap_or_else(|| crate::provider::OpenAIClient::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[async_trait]
impl ImageProvider for OpenAIImageClient {
    async fn generate(&self, prompt: &str, size: &str) -> Result<GeneratedImage, ServiceError> {
        let url = format!("{}/images/generations", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "prompt": prompt,
                "n": 1,
                "size": size,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let images: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Api(format!("Failed to parse images response: {}", e)))?;

        images
            .data
            .into_iter()
            .find_map(|image| image.url)
            .map(GeneratedImage::Url)
            .ok_or_else(|| ServiceError::Api("No image URL in response".to_string()))
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

/// Stable Diffusion inference endpoint client
pub struct StableDiffusionClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl StableDiffusionClient {
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-2-1-base";

    pub fn new(api_key: String, endpoint: Option<String>) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.unwrap_or_else(|| Self::DEFAULT_ENDPOINT.to_string()),
        })
    }
}

#[async_trait]
impl ImageProvider for StableDiffusionClient {
    async fn generate(&self, prompt: &str, size: &str) -> Result<GeneratedImage, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "inputs": prompt,
                "size": size,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ServiceError::Api("Empty image payload".to_string()));
        }
        Ok(GeneratedImage::Bytes(bytes.to_vec()))
    }

    fn provider_name(&self) -> &str {
        "stable-diffusion"
    }
}

pub struct ImageProviderFactory;

impl ImageProviderFactory {
    pub fn create_client(
        backend: ImageBackend,
        api_key: String,
        endpoint: Option<String>,
    ) -> Result<Arc<dyn ImageProvider>, ApiError> {
        match backend {
            ImageBackend::OpenAI => Ok(Arc::new(OpenAIImageClient::new(api_key, endpoint)?)),
            ImageBackend::StableDiffusion => {
                Ok(Arc::new(StableDiffusionClient::new(api_key, endpoint)?))
            }
        }
    }
}

// Mock image provider for testing
#[cfg(test)]
pub struct MockImageProvider {
    /// Prompts containing this marker fail with a service error
    pub fail_marker: Option<String>,
}

#[cfg(test)]
#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, prompt: &str, _size: &str) -> Result<GeneratedImage, ServiceError> {
        match &self.fail_marker {
            Some(marker) if prompt.contains(marker.as_str()) => {
                Err(ServiceError::InvalidRequest(format!("rejected prompt: {}", prompt)))
            }
            _ => Ok(GeneratedImage::Bytes(prompt.as_bytes().to_vec())),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
