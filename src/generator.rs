//! Top-level driver
//!
//! One `generate` call is a whole run: up to `1 + max_run_retries` attempts,
//! each of which researches the request from scratch and runs both pipelines.
//! The first successful attempt writes the artifact. The usage ledger gets an
//! `Initial` row at the start of every attempt and a `Complete` row after the
//! artifact is written.

use crate::config::{SiteConfig, Workspace};
use crate::content::ContentPipeline;
use crate::error::ApiError;
use crate::gateway::{ImageGateway, TextGateway};
use crate::image::ImagePipeline;
use crate::orchestrator::Orchestrator;
use crate::provider::{
    HttpImageFetcher, ImageFetcher, ImageProvider, ImageProviderFactory, OpenAIClient,
    TextProvider, TokenUsage,
};
use crate::research::Researcher;
use crate::retry::RetryExecutor;
use crate::template::SiteDocument;
use crate::types::GenerationRequest;
use crate::usage::{Stage, UsageContext, UsageLedger};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub request: GenerationRequest,
    pub site: SiteDocument,
    pub artifact: PathBuf,
    /// Attempts used, including the successful one
    pub attempts: u32,
}

pub struct SiteGenerator {
    researcher: Researcher,
    orchestrator: Orchestrator,
    usage: Arc<UsageLedger>,
    workspace: Workspace,
    max_run_retries: u32,
}

impl SiteGenerator {
    /// Wire the live OpenAI and image clients from configuration.
    pub fn from_config(config: &SiteConfig, workspace: Workspace) -> Result<Self, ApiError> {
        config.ensure_valid()?;
        let api_key = config.text.api_key.clone().unwrap_or_default();
        let text: Arc<dyn TextProvider> = Arc::new(OpenAIClient::new(
            config.text.model.clone(),
            api_key,
            config.text.base_url.clone(),
        )?);
        let image = ImageProviderFactory::create_client(
            config.image.backend,
            config.image_api_key().unwrap_or_default().to_string(),
            config.image.endpoint.clone(),
        )?;
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new()?);
        Self::from_providers(config, workspace, text, image, fetcher)
    }

    /// Wire the pipelines around the given service clients.
    pub fn from_providers(
        config: &SiteConfig,
        workspace: Workspace,
        text: Arc<dyn TextProvider>,
        image: Arc<dyn ImageProvider>,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Result<Self, ApiError> {
        let usage = Arc::new(UsageLedger::open(workspace.usage_log_path())?);
        let text = TextGateway::new(
            text,
            RetryExecutor::new(config.retry.text_policy()),
            usage.clone(),
        );
        let images = ImageGateway::new(
            image,
            fetcher,
            RetryExecutor::new(config.retry.image_policy()),
            config.image.size.clone(),
        );

        let content = ContentPipeline::new(text.clone(), config.text.content_model.clone());
        let image_pipeline = ImagePipeline::new(text.clone(), images)
            .with_gallery_size(config.pipeline.gallery_size)
            .with_max_concurrency(config.pipeline.max_concurrency);
        let orchestrator = Orchestrator::new(content, image_pipeline)
            .with_deadline(config.pipeline.deadline());

        Ok(Self {
            researcher: Researcher::new(text),
            orchestrator,
            usage,
            workspace,
            max_run_retries: config.pipeline.max_run_retries,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub async fn generate(&self, company: &str, topic: &str) -> Result<GenerationReport, ApiError> {
        let context = UsageContext {
            company: company.to_string(),
            keyword: topic.to_string(),
        };
        let max_attempts = self.max_run_retries.saturating_add(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            self.mark(&context, Stage::Initial);
            info!(company, topic, attempt, max_attempts, "Starting generation attempt");

            match self.attempt(company, topic).await {
                Ok((request, site)) => {
                    let artifact = crate::artifact::write_artifact(&self.workspace, &site)?;
                    self.mark(&context, Stage::Complete);
                    info!(company, attempt, "Generation complete");
                    return Ok(GenerationReport {
                        request,
                        site,
                        artifact,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(company, attempt, error = %e, "Generation attempt failed");
                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts were made".to_string());
        error!(company, attempts = max_attempts, "Maximum tries exceeded");
        Err(ApiError::RunFailed {
            attempts: max_attempts,
            last_error,
        })
    }

    async fn attempt(
        &self,
        company: &str,
        topic: &str,
    ) -> Result<(GenerationRequest, SiteDocument), ApiError> {
        let request = self.researcher.research(company, topic).await?;
        let site = self.orchestrator.run(&request).await?;
        Ok((request, site))
    }

    fn mark(&self, context: &UsageContext, stage: Stage) {
        if let Err(e) = self.usage.record(context, stage, TokenUsage::default()) {
            warn!(stage = %stage, error = %e, "Failed to record token usage");
        }
    }
}
