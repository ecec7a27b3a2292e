use crate::traits::FileSystem;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for live diff sessions, read from YAML
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LiveDiffConfig {
    /// Program used to compute the preview; whitespace separates leading args
    pub preview_command: String,

    /// URI scheme the virtual documents are served under
    pub scheme: String,

    /// Language id forced onto the virtual documents
    pub language: String,

    /// Context flag toggled while a live diff tab is focused
    pub context_key: String,

    /// Content served for an unknown fragment
    pub placeholder: String,

    /// Name of the diagnostic output channel
    pub channel: String,
}

impl Default for LiveDiffConfig {
    fn default() -> Self {
        Self {
            preview_command: "kusion".to_string(),
            scheme: "kusion".to_string(),
            language: "yaml".to_string(),
            context_key: "inKusionLiveDiff".to_string(),
            placeholder: "default".to_string(),
            channel: "Kusion".to_string(),
        }
    }
}

impl LiveDiffConfig {
    /// Default location: `<config dir>/kusion-livediff/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kusion-livediff").join("config.yaml"))
    }

    /// Load from an explicit file, else from the default location if present
    pub fn load(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(fs, path),
            None => match Self::default_path() {
                Some(path) if fs.is_file(&path) => Self::from_file(fs, &path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_to_string(path)?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: LiveDiffConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        if config.preview_command.trim().is_empty() {
            anyhow::bail!("preview_command in {:?} must not be empty", path);
        }

        Ok(config)
    }
}
