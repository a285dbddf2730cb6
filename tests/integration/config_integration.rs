//! Integration tests for the configuration system

use pagesmith::config::{ConfigLoader, SiteConfig, Workspace, WorkspaceMode};
use pagesmith::logging::{LogFormat, LogOutput};
use pagesmith::provider::ImageBackend;
use tempfile::TempDir;

#[test]
fn test_config_file_sections_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("test_config.toml");

    std::fs::write(
        &config_file,
        r#"
[workspace]
mode = "local"
root = "sites/acme"

[text]
api_key = "sk-test"
model = "gpt-4o-mini"

[image]
backend = "stable-diffusion"
api_key = "sd-test"
size = "512x512"

[retry]
initial_delay_ms = 250
count_connection_failures = false

[pipeline]
deadline_secs = 90
gallery_size = 6

[logging]
level = "debug"
format = "json"
output = "file"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.text.model, "gpt-4o-mini");
    assert_eq!(config.image.backend, ImageBackend::StableDiffusion);
    assert_eq!(config.image.size, "512x512");
    assert_eq!(config.retry.initial_delay_ms, 250);
    assert!(!config.retry.count_connection_failures);
    assert_eq!(config.retry.text_max_retries, 5);
    assert_eq!(config.pipeline.deadline_secs, 90);
    assert_eq!(config.pipeline.gallery_size, 6);
    assert_eq!(config.pipeline.max_run_retries, 2);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.output, LogOutput::File);

    let workspace = Workspace::resolve(&config.workspace);
    assert_eq!(
        workspace.artifact_path(),
        std::path::Path::new("sites/acme/content/data.json")
    );
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_workspace_config_directory_is_read() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[pipeline]\nmax_concurrency = 3\n",
    )
    .unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.pipeline.max_concurrency, 3);
}

#[test]
fn test_config_validation_collects_every_problem() {
    let mut config = SiteConfig::default();
    config.text.api_key = None;
    config.image.api_key = None;
    config.image.size = "large".to_string();
    config.pipeline.deadline_secs = 0;

    let errors = config.validate().unwrap_err();
    assert!(errors.len() >= 3, "{errors:?}");
}

#[test]
fn test_config_default_values() {
    let config = SiteConfig::default();
    assert_eq!(config.workspace.mode, WorkspaceMode::Local);
    assert_eq!(config.image.backend, ImageBackend::OpenAI);
    assert_eq!(config.image.size, "1024x1024");
    assert_eq!(config.pipeline.deadline_secs, 60);
    assert_eq!(config.pipeline.gallery_size, 8);
    assert_eq!(config.retry.image_max_retries, 3);
}
