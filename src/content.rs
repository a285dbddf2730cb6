//! Content pipeline
//!
//! Sequential text generation for one page: meta description, page body
//! (a single call whose response embeds a JSON object), then the locally
//! generated footer. Any failure aborts the pipeline; there is no partial
//! document.

pub mod extract;
pub mod footer;

use crate::document::{ContentDocument, Meta};
use crate::error::ApiError;
use crate::gateway::TextGateway;
use crate::prompts;
use crate::provider::CompletionOptions;
use crate::types::GenerationRequest;
use crate::usage::Stage;
use tracing::{debug, info};

/// Model used for the page body when none is configured.
pub const DEFAULT_CONTENT_MODEL: &str = "gpt-3.5-turbo-16k";

#[derive(Clone)]
pub struct ContentPipeline {
    text: TextGateway,
    content_model: String,
}

impl ContentPipeline {
    pub fn new(text: TextGateway, content_model: impl Into<String>) -> Self {
        Self {
            text,
            content_model: content_model.into(),
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<ContentDocument, ApiError> {
        let context = request.usage_context();

        let description = self
            .text
            .chat(
                Stage::MetaDescription,
                prompts::meta_description(&request.topic, &request.keyword),
                CompletionOptions::creative(),
                &context,
            )
            .await?;
        debug!(company = %request.company, "Meta description generated");

        let response = self
            .text
            .chat(
                Stage::ContentGeneration,
                prompts::body_content(
                    &request.company,
                    &request.title,
                    &request.industry,
                    &request.topic,
                    &request.keyword,
                ),
                CompletionOptions::creative().with_model(self.content_model.clone()),
                &context,
            )
            .await?;
        let body = extract::parse_body(&response)?;

        let footer = footer::generate(&request.company, &request.location, &mut rand::thread_rng());

        info!(company = %request.company, "Content generated");
        Ok(ContentDocument::assemble(
            Meta {
                title: request.title.clone(),
                description,
            },
            body,
            footer,
        ))
    }
}
