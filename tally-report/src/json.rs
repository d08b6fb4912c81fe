//! JSON export of the full analytics view.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use tally_core::AnalyticsData;

pub fn to_json_string(data: &AnalyticsData) -> Result<String> {
    serde_json::to_string_pretty(data).context("serialize analytics")
}

/// Write the analytics view as pretty JSON, creating parent directories.
pub fn write_json(data: &AnalyticsData, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, to_json_string(data)?).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(file = %path.display(), "wrote json export");
    Ok(())
}
