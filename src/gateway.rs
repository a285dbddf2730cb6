//! Retry-wrapped access to the text and image services.
//!
//! Pipelines talk to the gateways, never to providers directly: every call is
//! run through the [`RetryExecutor`] and every completed text call is recorded
//! in the token usage ledger.

use crate::error::ApiError;
use crate::prompts::SYSTEM_PERSONA;
use crate::provider::fetch::encode_image;
use crate::provider::{
    ChatMessage, CompletionOptions, GeneratedImage, ImageFetcher, ImageProvider, TextProvider,
};
use crate::retry::RetryExecutor;
use crate::usage::{Stage, UsageContext, UsageLedger};
use std::sync::Arc;
use tracing::{debug, warn};

/// A text prompt: a bare instruction, or a full conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Sent after the fixed system persona
    Text(String),
    /// Sent as-is
    Messages(Vec<ChatMessage>),
}

impl Prompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            Prompt::Text(text) => vec![ChatMessage::system(SYSTEM_PERSONA), ChatMessage::user(text)],
            Prompt::Messages(messages) => messages,
        }
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<Vec<ChatMessage>> for Prompt {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Prompt::Messages(messages)
    }
}

#[derive(Clone)]
pub struct TextGateway {
    provider: Arc<dyn TextProvider>,
    retry: RetryExecutor,
    usage: Arc<UsageLedger>,
}

impl TextGateway {
    pub fn new(provider: Arc<dyn TextProvider>, retry: RetryExecutor, usage: Arc<UsageLedger>) -> Self {
        Self {
            provider,
            retry,
            usage,
        }
    }

    pub fn usage(&self) -> &Arc<UsageLedger> {
        &self.usage
    }

    /// Generate text for `stage`, retrying per policy and recording token usage.
    pub async fn chat(
        &self,
        stage: Stage,
        prompt: impl Into<Prompt>,
        options: CompletionOptions,
        context: &UsageContext,
    ) -> Result<String, ApiError> {
        let messages = prompt.into().into_messages();
        let response = self
            .retry
            .execute(stage.as_str(), || {
                self.provider.complete(messages.clone(), options.clone())
            })
            .await
            .map_err(|e| ApiError::retry(stage.as_str(), e))?;

        debug!(
            stage = %stage,
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Text generated"
        );
        if let Err(e) = self.usage.record(context, stage, response.usage) {
            warn!(stage = %stage, error = %e, "Failed to record token usage");
        }
        Ok(response.content)
    }
}

#[derive(Clone)]
pub struct ImageGateway {
    provider: Arc<dyn ImageProvider>,
    fetcher: Arc<dyn ImageFetcher>,
    retry: RetryExecutor,
    size: String,
}

impl ImageGateway {
    pub const DEFAULT_SIZE: &'static str = "1024x1024";

    pub fn new(
        provider: Arc<dyn ImageProvider>,
        fetcher: Arc<dyn ImageFetcher>,
        retry: RetryExecutor,
        size: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            fetcher,
            retry,
            size: size.into(),
        }
    }

    /// Generate one image and return it base64-encoded.
    pub async fn render(&self, prompt: &str, section: &str) -> Result<String, ApiError> {
        let image = self
            .retry
            .execute(section, || self.provider.generate(prompt, &self.size))
            .await
            .map_err(|e| ApiError::retry(format!("{} image generation", section), e))?;

        match image {
            GeneratedImage::Url(url) => self
                .fetcher
                .fetch_base64(&url)
                .await
                .ok_or(ApiError::ImageFetchFailed(url)),
            GeneratedImage::Bytes(bytes) => Ok(encode_image(&bytes)),
        }
    }
}
