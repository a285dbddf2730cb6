//! CLI route: single route table and run context. Dispatches to the generator and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_config_toml, format_generation_report, format_usage_summary};
use crate::config::{ConfigLoader, SiteConfig, Workspace, WorkspaceMode};
use crate::error::ApiError;
use crate::generator::SiteGenerator;
use crate::usage::UsageLedger;
use std::path::PathBuf;
use tracing::info;

/// Runtime context for CLI execution: resolved configuration and workspace.
pub struct RunContext {
    config: SiteConfig,
    workspace: Workspace,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    ///
    /// A `local` workspace whose configured root is left at its default uses the
    /// `--workspace` directory.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        if config.workspace.mode == WorkspaceMode::Local && config.workspace.root == PathBuf::from(".")
        {
            config.workspace.root = workspace_root;
        }
        let workspace = Workspace::resolve(&config.workspace);
        info!(workspace = %workspace.root().display(), "Workspace resolved");
        Ok(Self { config, workspace })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Generate {
                company,
                topic,
                format,
            } => self.handle_generate(company.as_deref(), topic.as_deref(), format),
            Commands::Usage { company } => self.handle_usage(company.as_deref()),
            Commands::Config => format_config_toml(&self.config),
        }
    }

    fn handle_generate(
        &self,
        company: Option<&str>,
        topic: Option<&str>,
        format: &str,
    ) -> Result<String, ApiError> {
        let company = match company {
            Some(c) => c.trim().to_string(),
            None => prompt_for("Company name")?,
        };
        let topic = match topic {
            Some(t) => t.trim().to_string(),
            None => prompt_for("Topic")?,
        };
        if company.is_empty() || topic.is_empty() {
            return Err(ApiError::ConfigError(
                "Company name and topic must not be empty".to_string(),
            ));
        }

        let generator = SiteGenerator::from_config(&self.config, self.workspace.clone())?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ProviderError(format!("Failed to create runtime: {}", e)))?;
        let report = runtime.block_on(generator.generate(&company, &topic))?;
        format_generation_report(&report, format)
    }

    fn handle_usage(&self, company: Option<&str>) -> Result<String, ApiError> {
        let path = self.workspace.usage_log_path();
        if !path.exists() {
            return Ok(format!("No token usage recorded at {}", path.display()));
        }
        let rows = UsageLedger::read_rows(&path)?;
        Ok(format_usage_summary(&rows, company))
    }
}

fn prompt_for(label: &str) -> Result<String, ApiError> {
    use dialoguer::Input;

    let value: String = Input::new()
        .with_prompt(label)
        .interact_text()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
    Ok(value.trim().to_string())
}
