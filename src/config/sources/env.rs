//! Environment sources: `PAGESMITH__SECTION__KEY` overrides, then the
//! well-known credential and workspace variables.

use crate::config::{SiteConfig, WorkspaceMode};
use crate::provider::ImageBackend;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use tracing::warn;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const STABILITY_KEY: &str = "STABILITY_KEY";
pub const MEMORY_DIRECTORY: &str = "MEMORY_DIRECTORY";

/// Add `PAGESMITH__TEXT__MODEL=...` style overrides.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("PAGESMITH")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}

/// Apply the well-known variables on top of the loaded config.
///
/// `STABILITY_KEY` only applies to the Stable Diffusion backend; the OpenAI
/// image backend reuses the text credentials.
pub fn apply_well_known<F>(mut config: SiteConfig, lookup: F) -> SiteConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(OPENAI_API_KEY).filter(|k| !k.is_empty()) {
        config.text.api_key = Some(key);
    }
    if config.image.backend == ImageBackend::StableDiffusion {
        if let Some(key) = lookup(STABILITY_KEY).filter(|k| !k.is_empty()) {
            config.image.api_key = Some(key);
        }
    }
    if let Some(dir) = lookup(MEMORY_DIRECTORY) {
        match dir.as_str() {
            "production" => config.workspace.mode = WorkspaceMode::Ephemeral,
            "local" => config.workspace.mode = WorkspaceMode::Local,
            other => warn!(value = other, "Ignoring unknown MEMORY_DIRECTORY"),
        }
    }
    config
}
