//! Runs the content and image pipelines side by side under one deadline and
//! assembles their results into the page layout.

use crate::concurrency::TaskGroup;
use crate::content::ContentPipeline;
use crate::document::{ContentDocument, ImageSet, MergedDocument};
use crate::error::ApiError;
use crate::image::ImagePipeline;
use crate::template::{self, SiteDocument};
use crate::types::GenerationRequest;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pipeline {
    Content,
    Images,
}

impl Pipeline {
    fn name(&self) -> &'static str {
        match self {
            Pipeline::Content => "content",
            Pipeline::Images => "image",
        }
    }
}

enum PipelineOutput {
    Content(Result<ContentDocument, ApiError>),
    Images(ImageSet),
}

pub struct Orchestrator {
    content: ContentPipeline,
    images: ImagePipeline,
    deadline: Duration,
}

impl Orchestrator {
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

    pub fn new(content: ContentPipeline, images: ImagePipeline) -> Self {
        Self {
            content,
            images,
            deadline: Self::DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// One generation run. Either pipeline failing, or not finishing before
    /// the deadline, fails the whole run.
    #[instrument(skip(self, request), fields(company = %request.company))]
    pub async fn run(&self, request: &GenerationRequest) -> Result<SiteDocument, ApiError> {
        let deadline = Instant::now() + self.deadline;
        let mut group = TaskGroup::new(2);

        let content = self.content.clone();
        let content_request = request.clone();
        group.spawn(Pipeline::Content, async move {
            PipelineOutput::Content(content.generate(&content_request).await)
        });

        let images = self.images.clone();
        let image_request = request.clone();
        group.spawn(Pipeline::Images, async move {
            PipelineOutput::Images(images.generate(&image_request).await)
        });

        let mut outcome = group.join_until(Some(deadline)).await;
        if let Some(pipeline) = outcome.unfinished.first() {
            return Err(if outcome.timed_out {
                ApiError::DeadlineExceeded(self.deadline.as_secs(), pipeline.name())
            } else {
                ApiError::PipelineFailed(pipeline.name(), "task did not complete".to_string())
            });
        }

        let content = match outcome.take(&Pipeline::Content) {
            Some(PipelineOutput::Content(result)) => {
                result.map_err(|e| ApiError::PipelineFailed(Pipeline::Content.name(), e.to_string()))?
            }
            _ => return Err(missing(Pipeline::Content)),
        };
        let images = match outcome.take(&Pipeline::Images) {
            Some(PipelineOutput::Images(images)) => images,
            _ => return Err(missing(Pipeline::Images)),
        };

        let merged = MergedDocument::merge(&content, &images)?;
        info!("Content and images merged");
        Ok(template::project(&merged))
    }
}

fn missing(pipeline: Pipeline) -> ApiError {
    ApiError::PipelineFailed(pipeline.name(), "no result".to_string())
}
