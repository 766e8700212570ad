//! Loads semantic functions from a directory tree:
//!
//! ```text
//! <root>/<Skill>/<Function>/skprompt.txt
//! <root>/<Skill>/<Function>/config.json   (optional)
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::FunctionRegistry;
use crate::error::KernelError;
use crate::function::{CompletionSettings, ParameterView};

const PROMPT_FILE: &str = "skprompt.txt";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PromptConfig {
    description: String,
    completion: Option<CompletionSettings>,
    input: InputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InputConfig {
    parameters: Vec<ParameterConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParameterConfig {
    name: String,
    description: String,
    #[serde(rename = "defaultValue", alias = "default_value")]
    default_value: Option<String>,
}

impl From<ParameterConfig> for ParameterView {
    fn from(p: ParameterConfig) -> Self {
        Self {
            name: p.name,
            description: p.description,
            default_value: p.default_value,
        }
    }
}

/// True when `skill` passes the optional allow-list (case-insensitive).
pub fn should_load(skill: &str, filter: Option<&[String]>) -> bool {
    match filter {
        Some(allowed) => allowed.iter().any(|s| s.eq_ignore_ascii_case(skill)),
        None => true,
    }
}

impl FunctionRegistry {
    /// Register every prompt function found under `root`.
    ///
    /// Functions whose `config.json` has no `completion` section use
    /// `defaults`. A template that fails to parse, or a directory whose name is
    /// not a valid skill or function name, is skipped with a warning; a name
    /// conflict or an unreadable file aborts loading. Returns the number
    /// registered.
    pub fn load_semantic_skills(
        &mut self,
        root: &Path,
        filter: Option<&[String]>,
        defaults: &CompletionSettings,
    ) -> Result<usize> {
        let mut loaded = 0;

        for skill_dir in sorted_dirs(root)? {
            let Some(skill) = dir_name(&skill_dir) else {
                continue;
            };
            if !should_load(&skill, filter) {
                tracing::debug!(skill = %skill, "skipped by filter");
                continue;
            }

            for function_dir in sorted_dirs(&skill_dir)? {
                let prompt_path = function_dir.join(PROMPT_FILE);
                if !prompt_path.is_file() {
                    continue;
                }
                let Some(function) = dir_name(&function_dir) else {
                    continue;
                };

                let template = fs::read_to_string(&prompt_path)
                    .with_context(|| format!("failed to read {}", prompt_path.display()))?;
                let config = read_config(&function_dir.join(CONFIG_FILE))?;
                let declared: Vec<ParameterView> =
                    config.input.parameters.into_iter().map(Into::into).collect();

                match self.register_semantic_with(
                    &skill,
                    &function,
                    &config.description,
                    &template,
                    config.completion.unwrap_or(*defaults),
                    &declared,
                ) {
                    Ok(()) => loaded += 1,
                    Err(e @ (KernelError::Template(_) | KernelError::InvalidName(_))) => {
                        tracing::warn!(skill = %skill, function = %function, error = %e, "could not load prompt function");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tracing::info!(root = %root.display(), loaded, "loaded semantic skills");
        Ok(loaded)
    }
}

fn read_config(path: &Path) -> Result<PromptConfig> {
    if !path.is_file() {
        return Ok(PromptConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid {}", path.display()))
}

fn sorted_dirs(path: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut dirs = fs::read_dir(path)
        .with_context(|| format!("failed to list {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect::<Vec<_>>();
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}
