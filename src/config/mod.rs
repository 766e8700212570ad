//! Settings loaded from a JSON file.
//!
//! Every field is optional in the file; missing ones take their defaults.
//! A missing file is not an error. CLI flags override what is loaded here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_ACTIVITY_URL, DEFAULT_LOG_FILTER};
use crate::function::CompletionSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Endpoint for `RandomActivity.GetRandomActivity`.
    pub activity_url: String,
    /// Root of `<Skill>/<Function>/skprompt.txt` prompt functions.
    pub skills_dir: Option<PathBuf>,
    /// Skills to load (case-insensitive). `None` loads all.
    pub skills: Option<Vec<String>>,
    /// Completion settings for prompt functions without a `config.json`.
    pub completion: CompletionSettings,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            activity_url: DEFAULT_ACTIVITY_URL.to_string(),
            skills_dir: None,
            skills: None,
            completion: CompletionSettings::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
