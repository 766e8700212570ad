//! `{{$VARIABLE}}` prompt templates.
//!
//! Only variable blocks are supported. Anything else inside `{{ }}` is
//! rejected when the template is parsed, so a semantic function never fails
//! on syntax at run time.

use crate::context::ExecutionContext;
use crate::error::KernelError;

use super::{ParameterView, is_valid_name};

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Text(String),
    Variable(String),
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
    blocks: Vec<Block>,
}

impl PromptTemplate {
    pub fn parse(source: &str) -> Result<Self, KernelError> {
        let mut blocks = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                blocks.push(Block::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                KernelError::Template(format!(
                    "unterminated block at byte {}",
                    source.len() - rest.len() + start
                ))
            })?;

            let inner = after[..end].trim();
            let name = inner.strip_prefix('$').ok_or_else(|| {
                KernelError::Template(format!("unsupported block '{{{{{inner}}}}}'"))
            })?;
            if !is_valid_name(name) {
                return Err(KernelError::Template(format!(
                    "invalid variable name '{name}'"
                )));
            }
            blocks.push(Block::Variable(name.to_ascii_uppercase()));

            rest = &after[end + 2..];
        }

        if !rest.is_empty() {
            blocks.push(Block::Text(rest.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            blocks,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct variable names, in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for block in &self.blocks {
            if let Block::Variable(name) = block {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Fill every variable from `context`. An unset variable takes its
    /// parameter default, or renders empty.
    pub fn render(&self, context: &ExecutionContext, parameters: &[ParameterView]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for block in &self.blocks {
            match block {
                Block::Text(text) => out.push_str(text),
                Block::Variable(name) => {
                    let value = context.get(name).or_else(|| {
                        parameters
                            .iter()
                            .find(|p| p.name.eq_ignore_ascii_case(name))
                            .and_then(|p| p.default_value.as_deref())
                    });
                    match value {
                        Some(value) => out.push_str(value),
                        None => tracing::warn!(variable = %name, "template variable not set"),
                    }
                }
            }
        }
        out
    }
}
