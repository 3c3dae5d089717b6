//! Drawing document: the JSON file the CLI writes and reads back.
//!
//! ```json
//! {
//!   "version": 1,
//!   "savedAt": "2026-01-01T00:00:00Z",
//!   "scale": 10.0,
//!   "groups": [ ... ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ashiba::{DEFAULT_SCALE, ScaffoldGroup};

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingDocument {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// Millimeters per canvas pixel.
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub groups: Vec<ScaffoldGroup>,
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

impl DrawingDocument {
    pub fn new(scale: f64, groups: Vec<ScaffoldGroup>) -> Self {
        Self { version: DOCUMENT_VERSION, saved_at: Utc::now(), scale, groups }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: DrawingDocument =
            serde_json::from_str(json).context("not a drawing document")?;
        if document.version != DOCUMENT_VERSION {
            bail!(
                "unsupported document version {} (expected {})",
                document.version,
                DOCUMENT_VERSION
            );
        }
        Ok(document)
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
