//! Merge rules: defaults first, then each source overrides the one before it.
//!
//! Order, lowest to highest: built-in defaults, global file, workspace files,
//! `PAGESMITH__SECTION__KEY` environment variables, well-known credential
//! variables.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("workspace.mode", "local")?
        .set_default("workspace.root", ".")?
        .set_default("text.model", "gpt-3.5-turbo")?
        .set_default("text.content_model", "gpt-3.5-turbo-16k")?
        .set_default("image.backend", "openai")?
        .set_default("image.size", "1024x1024")?
        .set_default("pipeline.deadline_secs", 60)?
        .set_default("pipeline.max_run_retries", 2)
}
