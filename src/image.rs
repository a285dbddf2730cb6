//! Image pipeline
//!
//! The logo is generated first, on its own. Then two fan-outs run one after the
//! other: the four named sections, then the gallery. Every fan-out task writes
//! a description with the text service, renders it, and fetches the result.
//! Failures stay isolated: a failed section image is left empty and a failed
//! gallery image is left out.

use crate::concurrency::TaskGroup;
use crate::document::{ImageSection, ImageSet};
use crate::error::ApiError;
use crate::gateway::{ImageGateway, TextGateway};
use crate::prompts;
use crate::provider::CompletionOptions;
use crate::types::GenerationRequest;
use crate::usage::Stage;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ImagePipeline {
    text: TextGateway,
    images: ImageGateway,
    gallery_size: usize,
    max_concurrency: usize,
}

impl ImagePipeline {
    pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

    pub fn new(text: TextGateway, images: ImageGateway) -> Self {
        Self {
            text,
            images,
            gallery_size: ImageSet::GALLERY_SIZE,
            max_concurrency: Self::DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Number of gallery images to attempt, capped at [`ImageSet::GALLERY_SIZE`].
    pub fn with_gallery_size(mut self, gallery_size: usize) -> Self {
        self.gallery_size = gallery_size.min(ImageSet::GALLERY_SIZE);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub async fn generate(&self, request: &GenerationRequest) -> ImageSet {
        let request = Arc::new(request.clone());
        let mut images = ImageSet::default();

        match self.logo(&request).await {
            Ok(logo) => images.logo = logo,
            Err(e) => warn!(company = %request.company, error = %e, "Logo generation failed"),
        }

        let mut sections = TaskGroup::new(self.max_concurrency);
        for section in ImageSection::ALL {
            let pipeline = self.clone();
            let request = request.clone();
            sections.spawn(section, async move {
                pipeline.illustrate(&request, section.key()).await
            });
        }
        let outcome = sections.join_all().await;
        for (section, result) in outcome.completed {
            match result {
                Ok(image) => images.set_section(section, image),
                Err(e) => warn!(section = section.key(), error = %e, "Section image failed"),
            }
        }

        let mut gallery = TaskGroup::new(self.max_concurrency);
        for index in 0..self.gallery_size {
            let pipeline = self.clone();
            let request = request.clone();
            gallery.spawn(index, async move {
                pipeline
                    .illustrate(&request, &format!("gallery {}", index))
                    .await
            });
        }
        let outcome = gallery.join_all().await;
        for (index, result) in outcome.completed {
            match result {
                Ok(image) => images.gallery.push(image),
                Err(e) => warn!(index, error = %e, "Gallery image failed"),
            }
        }

        info!(
            company = %request.company,
            gallery = images.gallery.len(),
            "Images generated"
        );
        images
    }

    async fn logo(&self, request: &GenerationRequest) -> Result<String, ApiError> {
        let concept = self
            .text
            .chat(
                Stage::LogoDescription,
                prompts::logo_concept(&request.company, &request.topic, &request.industry),
                CompletionOptions::creative(),
                &request.usage_context(),
            )
            .await?;
        self.images.render(&concept, "logo").await
    }

    /// Describe, render and fetch one image.
    async fn illustrate(&self, request: &GenerationRequest, label: &str) -> Result<String, ApiError> {
        let description = self
            .text
            .chat(
                Stage::ImageDescription,
                prompts::image_description(&request.keyword, &request.topic),
                CompletionOptions::creative(),
                &request.usage_context(),
            )
            .await?;
        self.images.render(&description, label).await
    }
}
