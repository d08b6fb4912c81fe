//! tally-report: text tables and file exports for analytics views

pub mod csv_bundle;
pub mod json;
pub mod table;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tally_core::AnalyticsData;

pub use csv_bundle::write_csv_bundle;
pub use json::{to_json_string, write_json};
pub use table::{RenderOptions, render_summary};

/// Currency codes shown in column headings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub primary: String,
    pub alt: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            primary: "BGN".to_string(),
            alt: "EUR".to_string(),
        }
    }
}

/// Two-decimal amount text used by every output.
pub fn money(v: f64) -> String {
    format!("{v:.2}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One CSV file per sheet, written into a directory
    Csv,
    /// A single JSON document
    Json,
}

impl ExportFormat {
    /// Output name used when the caller gives only a directory.
    pub fn default_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "tally-export",
            ExportFormat::Json => "tally-export.json",
        }
    }
}

/// Write `data` to `out` in the given format. For CSV `out` is a directory.
pub fn export(
    data: &AnalyticsData,
    format: ExportFormat,
    out: impl AsRef<Path>,
    labels: &Labels,
) -> Result<Vec<PathBuf>> {
    let out = out.as_ref();
    match format {
        ExportFormat::Csv => write_csv_bundle(data, out, labels),
        ExportFormat::Json => {
            write_json(data, out)?;
            Ok(vec![out.to_path_buf()])
        }
    }
}
