//! `Text.*`: string helpers written to `RESULT`.
//!
//! Each function transforms the previous step's `RESULT`, or `INPUT` when
//! nothing has produced a result yet, so they chain after other functions.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::consts::{INPUT_VARIABLE, RESULT_VARIABLE};
use crate::context::ExecutionContext;
use crate::function::{NativeFunction, ParameterView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    Trim,
    TrimStart,
    TrimEnd,
    Uppercase,
    Lowercase,
}

impl TextOp {
    pub const ALL: [TextOp; 5] = [
        TextOp::Trim,
        TextOp::TrimStart,
        TextOp::TrimEnd,
        TextOp::Uppercase,
        TextOp::Lowercase,
    ];

    fn name(self) -> &'static str {
        match self {
            TextOp::Trim => "Trim",
            TextOp::TrimStart => "TrimStart",
            TextOp::TrimEnd => "TrimEnd",
            TextOp::Uppercase => "Uppercase",
            TextOp::Lowercase => "Lowercase",
        }
    }

    fn description(self) -> &'static str {
        match self {
            TextOp::Trim => "Remove leading and trailing whitespace",
            TextOp::TrimStart => "Remove leading whitespace",
            TextOp::TrimEnd => "Remove trailing whitespace",
            TextOp::Uppercase => "Convert to upper case",
            TextOp::Lowercase => "Convert to lower case",
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            TextOp::Trim => text.trim().to_string(),
            TextOp::TrimStart => text.trim_start().to_string(),
            TextOp::TrimEnd => text.trim_end().to_string(),
            TextOp::Uppercase => text.to_uppercase(),
            TextOp::Lowercase => text.to_lowercase(),
        }
    }
}

pub struct TextFunction {
    op: TextOp,
}

impl TextFunction {
    pub fn new(op: TextOp) -> Self {
        Self { op }
    }
}

#[async_trait]
impl NativeFunction for TextFunction {
    fn name(&self) -> &str {
        self.op.name()
    }

    fn description(&self) -> &str {
        self.op.description()
    }

    fn parameters(&self) -> Vec<ParameterView> {
        vec![
            ParameterView::new(RESULT_VARIABLE, "Output of the previous step, transformed first"),
            ParameterView::new(INPUT_VARIABLE, "Text to transform when there is no result yet")
                .with_default(""),
        ]
    }

    async fn invoke(&self, context: &mut ExecutionContext) -> Result<()> {
        let source = context
            .result()
            .or_else(|| context.input())
            .unwrap_or_default();
        let output = self.op.apply(source);
        context.set_result(output);
        Ok(())
    }
}

/// One function per [`TextOp`].
pub fn functions() -> Vec<Arc<dyn NativeFunction>> {
    TextOp::ALL
        .into_iter()
        .map(|op| Arc::new(TextFunction::new(op)) as Arc<dyn NativeFunction>)
        .collect()
}
