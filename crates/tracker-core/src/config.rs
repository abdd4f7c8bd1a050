use crate::error::Result;
use crate::paths;
use serde::Deserialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Optional settings read from `<data-dir>/config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Ask before deleting a project or an image.
    #[serde(default = "default_confirm_deletes")]
    pub confirm_deletes: bool,
    /// Output format for images whose tag is not png, jpeg, webp or avif.
    #[serde(default = "default_export_format")]
    pub default_export_format: String,
}

fn default_confirm_deletes() -> bool {
    true
}

fn default_export_format() -> String {
    "png".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confirm_deletes: default_confirm_deletes(),
            default_export_format: default_export_format(),
        }
    }
}

impl Config {
    /// Load the config, falling back to defaults when the file is absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = paths::config_path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }
}
