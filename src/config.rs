use crate::model::MapDefaults;
use crate::palette::Platform;
use crate::statics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Editor settings, read from a JSON5 file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub map_defaults: MapDefaults,
    pub platform: Platform,
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            map_defaults: MapDefaults::default(),
            platform: Platform::default(),
            log_filter: statics::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        Self::parse(&text).with_context(|| format!("parsing config {path:?}"))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(json5::from_str(text)?)
    }
}
