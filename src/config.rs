//! Configuration System
//!
//! Layered configuration built once at startup: built-in defaults, the global
//! config file, workspace config files, `PAGESMITH__SECTION__KEY` environment
//! overrides and finally the well-known credential variables. The resulting
//! [`SiteConfig`] is passed down explicitly; nothing reads configuration from
//! globals after loading.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::ImageBackend;
use crate::retry::BackoffPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod merge;
mod sources;
mod workspace;

pub use sources::env::{MEMORY_DIRECTORY, OPENAI_API_KEY, STABILITY_KEY};
pub use sources::global_file::global_config_path;
pub use workspace::Workspace;

/// Where run output and the usage ledger live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceMode {
    /// Persistent directory (`workspace.root`)
    Local,
    /// The system temp directory
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub mode: WorkspaceMode,
    pub root: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            mode: WorkspaceMode::Local,
            root: PathBuf::from("."),
        }
    }
}

/// Text-generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub api_key: Option<String>,
    /// OpenAI-compatible endpoint; the public API when unset
    pub base_url: Option<String>,
    pub model: String,
    /// Model for the long page-body call
    pub content_model: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-3.5-turbo".to_string(),
            content_model: crate::content::DEFAULT_CONTENT_MODEL.to_string(),
        }
    }
}

/// Image-generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub backend: ImageBackend,
    /// Falls back to the text credentials for the OpenAI backend
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub size: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            backend: ImageBackend::OpenAI,
            api_key: None,
            endpoint: None,
            size: crate::gateway::ImageGateway::DEFAULT_SIZE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub initial_delay_ms: u64,
    pub exponential_base: f64,
    pub jitter: bool,
    pub text_max_retries: u32,
    pub image_max_retries: u32,
    pub count_connection_failures: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1000,
            exponential_base: 2.0,
            jitter: true,
            text_max_retries: BackoffPolicy::TEXT_MAX_RETRIES,
            image_max_retries: BackoffPolicy::IMAGE_MAX_RETRIES,
            count_connection_failures: true,
        }
    }
}

impl RetryConfig {
    fn policy(&self, max_retries: u32) -> BackoffPolicy {
        BackoffPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            exponential_base: self.exponential_base,
            jitter: self.jitter,
            max_retries,
            count_connection_failures: self.count_connection_failures,
        }
    }

    pub fn text_policy(&self) -> BackoffPolicy {
        self.policy(self.text_max_retries)
    }

    pub fn image_policy(&self) -> BackoffPolicy {
        self.policy(self.image_max_retries)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Shared deadline for the content and image pipelines
    pub deadline_secs: u64,
    /// Whole-run retries after the first attempt
    pub max_run_retries: u32,
    pub gallery_size: usize,
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 60,
            max_run_retries: 2,
            gallery_size: crate::document::ImageSet::GALLERY_SIZE,
            max_concurrency: crate::image::ImagePipeline::DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl PipelineConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub workspace: WorkspaceConfig,
    pub text: TextConfig,
    pub image: ImageConfig,
    pub retry: RetryConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Text(String),
    Image(String),
    Retry(String),
    Pipeline(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Text(msg) => write!(f, "text: {}", msg),
            ValidationError::Image(msg) => write!(f, "image: {}", msg),
            ValidationError::Retry(msg) => write!(f, "retry: {}", msg),
            ValidationError::Pipeline(msg) => write!(f, "pipeline: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

impl SiteConfig {
    /// Credentials for the image backend.
    pub fn image_api_key(&self) -> Option<&str> {
        match (&self.image.api_key, self.image.backend) {
            (Some(key), _) => Some(key.as_str()),
            (None, ImageBackend::OpenAI) => self.text.api_key.as_deref(),
            (None, ImageBackend::StableDiffusion) => None,
        }
    }

    /// Check everything a generation run needs, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.text.api_key.as_deref().map_or(true, str::is_empty) {
            errors.push(ValidationError::Text(format!(
                "API key is missing (set {} or text.api_key)",
                OPENAI_API_KEY
            )));
        }
        if self.text.model.is_empty() || self.text.content_model.is_empty() {
            errors.push(ValidationError::Text("model names cannot be empty".to_string()));
        }
        if let Some(url) = self.text.base_url.as_deref().filter(|u| !is_url(u)) {
            errors.push(ValidationError::Text(format!("invalid base_url '{}'", url)));
        }

        if self.image_api_key().map_or(true, str::is_empty) {
            let hint = match self.image.backend {
                ImageBackend::OpenAI => OPENAI_API_KEY,
                ImageBackend::StableDiffusion => STABILITY_KEY,
            };
            errors.push(ValidationError::Image(format!(
                "API key is missing (set {} or image.api_key)",
                hint
            )));
        }
        if let Some(url) = self.image.endpoint.as_deref().filter(|u| !is_url(u)) {
            errors.push(ValidationError::Image(format!("invalid endpoint '{}'", url)));
        }
        if !is_image_size(&self.image.size) {
            errors.push(ValidationError::Image(format!(
                "invalid size '{}' (expected WIDTHxHEIGHT)",
                self.image.size
            )));
        }

        if self.retry.exponential_base < 1.0 {
            errors.push(ValidationError::Retry(
                "exponential_base must be at least 1".to_string(),
            ));
        }
        if self.retry.text_max_retries == 0 || self.retry.image_max_retries == 0 {
            errors.push(ValidationError::Retry(
                "max retries must be at least 1".to_string(),
            ));
        }

        if self.pipeline.deadline_secs == 0 {
            errors.push(ValidationError::Pipeline(
                "deadline_secs must be positive".to_string(),
            ));
        }
        if self.pipeline.gallery_size > crate::document::ImageSet::GALLERY_SIZE {
            errors.push(ValidationError::Pipeline(format!(
                "gallery_size cannot exceed {}",
                crate::document::ImageSet::GALLERY_SIZE
            )));
        }
        if self.pipeline.max_concurrency == 0 {
            errors.push(ValidationError::Pipeline(
                "max_concurrency must be positive".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold every problem into one error.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })
    }

    /// Copy with credentials masked, for display.
    pub fn redacted(&self) -> SiteConfig {
        let mut config = self.clone();
        let mask = |key: &mut Option<String>| {
            if key.is_some() {
                *key = Some("********".to_string());
            }
        };
        mask(&mut config.text.api_key);
        mask(&mut config.image.api_key);
        config
    }
}

fn is_image_size(size: &str) -> bool {
    match size.split_once('x') {
        Some((w, h)) => w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok(),
        None => false,
    }
}

/// Builds a [`SiteConfig`] from its sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the full layered configuration for `workspace_root`.
    pub fn load(workspace_root: &Path) -> Result<SiteConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::env::add_to_builder(builder);
        let config: SiteConfig = builder.build()?.try_deserialize()?;
        Ok(sources::env::apply_well_known(config, |name| {
            std::env::var(name).ok()
        }))
    }

    /// Load a single file on top of the defaults, skipping the global and
    /// workspace files. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<SiteConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true));
        let builder = sources::env::add_to_builder(builder);
        let config: SiteConfig = builder.build()?.try_deserialize()?;
        Ok(sources::env::apply_well_known(config, |name| {
            std::env::var(name).ok()
        }))
    }
}
