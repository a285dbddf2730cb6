//! Writes the finished site document into the workspace.

use crate::config::Workspace;
use crate::error::ApiError;
use crate::template::SiteDocument;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::PathBuf;
use tracing::info;

/// Serialize `site` with four-space indentation.
pub fn render(site: &SiteDocument) -> Result<Vec<u8>, ApiError> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    site.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Write `content/data.json`, replacing any previous artifact.
pub fn write_artifact(workspace: &Workspace, site: &SiteDocument) -> Result<PathBuf, ApiError> {
    let dir = workspace.content_dir();
    std::fs::create_dir_all(&dir).map_err(|source| ApiError::Write {
        path: dir.clone(),
        source,
    })?;

    let path = workspace.artifact_path();
    std::fs::write(&path, render(site)?).map_err(|source| ApiError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Site document written");
    Ok(path)
}
