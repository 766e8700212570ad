use serde::{Deserialize, Serialize};

use crate::error::KernelError;

use super::{ParameterView, PromptTemplate};

/// Knobs passed to the completion backend with a rendered prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.0,
            top_p: 0.0,
        }
    }
}

/// A function defined by a prompt template instead of code.
#[derive(Debug, Clone)]
pub struct SemanticFunction {
    template: PromptTemplate,
    settings: CompletionSettings,
}

impl SemanticFunction {
    pub fn new(template: &str, settings: CompletionSettings) -> Result<Self, KernelError> {
        Ok(Self {
            template: PromptTemplate::parse(template)?,
            settings,
        })
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Descriptor parameters: one per template variable, described by
    /// `declared` where a matching entry exists.
    pub fn parameters(&self, declared: &[ParameterView]) -> Vec<ParameterView> {
        self.template
            .variables()
            .into_iter()
            .map(|name| {
                declared
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(&name))
                    .cloned()
                    .unwrap_or_else(|| ParameterView::new(name, ""))
            })
            .collect()
    }
}
