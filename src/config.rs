//! Operator defaults for import, tagging and export.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::text::Delimiter;
use crate::error::{PipelineError, Result};

/// Environment variable naming a JSON config file for the viewer.
pub const CONFIG_ENV: &str = "RUSTY_LUMEN_CONFIG";

/// Upper bound on tag rows the viewer offers.
pub const MAX_TAG_SLOTS: usize = 10;

/// Export file names and snapshot geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,

    #[serde(default = "default_image_file")]
    pub image_file: String,

    /// Pixel height of each column's band in the snapshot.
    #[serde(default = "default_image_band_height")]
    pub image_band_height: u32,

    /// Write the snapshot alongside the table.
    #[serde(default)]
    pub with_image: bool,
}

fn default_data_file() -> String {
    "exported_data.csv".to_string()
}

fn default_image_file() -> String {
    "exported_image.png".to_string()
}

fn default_image_band_height() -> u32 {
    8
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            image_file: default_image_file(),
            image_band_height: default_image_band_height(),
            with_image: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Separator for text files.
    #[serde(default)]
    pub delimiter: Delimiter,

    /// Number of `(start, final, step)` rows offered for tagging.
    #[serde(default = "default_tag_slots")]
    pub tag_slots: usize,

    /// Decimals used when showing axis values.
    #[serde(default = "default_label_precision")]
    pub label_precision: usize,

    /// Relabel columns as a square raster scan after import.
    #[serde(default)]
    pub raster_scan: bool,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_tag_slots() -> usize {
    3
}

fn default_label_precision() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            tag_slots: default_tag_slots(),
            label_precision: default_label_precision(),
            raster_scan: false,
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(text)?;
        config.tag_slots = config.tag_slots.clamp(1, MAX_TAG_SLOTS);
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Config named by [`CONFIG_ENV`], or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_json_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
