//! Workspace root resolution and the paths derived from it.

use super::{WorkspaceConfig, WorkspaceMode};
use crate::usage::UsageLedger;
use std::path::{Path, PathBuf};

/// Directory that receives the artifact and the usage ledger. Resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub const CONTENT_DIR: &'static str = "content";
    pub const ARTIFACT_FILE: &'static str = "data.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(config: &WorkspaceConfig) -> Self {
        match config.mode {
            WorkspaceMode::Local => Self::new(&config.root),
            WorkspaceMode::Ephemeral => Self::new(std::env::temp_dir()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(Self::CONTENT_DIR)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.content_dir().join(Self::ARTIFACT_FILE)
    }

    pub fn usage_log_path(&self) -> PathBuf {
        self.root.join(UsageLedger::FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mode_uses_configured_root() {
        let workspace = Workspace::resolve(&WorkspaceConfig {
            mode: WorkspaceMode::Local,
            root: PathBuf::from("/srv/site"),
        });
        assert_eq!(workspace.artifact_path(), PathBuf::from("/srv/site/content/data.json"));
        assert_eq!(workspace.usage_log_path(), PathBuf::from("/srv/site/token_usage.csv"));
    }

    #[test]
    fn ephemeral_mode_uses_temp_dir() {
        let workspace = Workspace::resolve(&WorkspaceConfig {
            mode: WorkspaceMode::Ephemeral,
            root: PathBuf::from("/srv/site"),
        });
        assert_eq!(workspace.root(), std::env::temp_dir().as_path());
    }
}
