pub mod semantic;
pub mod template;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::KernelError;

pub use semantic::{CompletionSettings, SemanticFunction};
pub use template::PromptTemplate;

/// One named input of a function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterView {
    pub name: String,
    pub description: String,
    pub default_value: Option<String>,
}

impl ParameterView {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Static metadata for a registered function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    pub collection: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterView>,
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.name)
    }
}

/// Names a function to run: `Collection.Function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionHandle {
    pub collection: String,
    pub name: String,
}

impl FunctionHandle {
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.name)
    }
}

impl FromStr for FunctionHandle {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (collection, name) = s
            .split_once('.')
            .ok_or_else(|| KernelError::InvalidName(s.to_string()))?;
        if !is_valid_name(collection) || !is_valid_name(name) {
            return Err(KernelError::InvalidName(s.to_string()));
        }
        Ok(Self::new(collection, name))
    }
}

/// Collection, function and variable names: ASCII letters, digits, `_`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A function implemented in Rust.
///
/// Reads and writes the context directly. Returning `Err` fails the run; a
/// long-running body should poll [`ExecutionContext::is_cancelled`] between
/// its own sub-steps.
#[async_trait]
pub trait NativeFunction: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Vec<ParameterView> {
        Vec::new()
    }
    async fn invoke(&self, context: &mut ExecutionContext) -> Result<()>;
}

/// What a registry entry runs. Decided once, at registration.
#[derive(Clone)]
pub enum Function {
    Native(Arc<dyn NativeFunction>),
    Semantic(SemanticFunction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Native,
    Semantic,
}

impl Function {
    pub fn kind(&self) -> FunctionKind {
        match self {
            Function::Native(_) => FunctionKind::Native,
            Function::Semantic(_) => FunctionKind::Semantic,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Native(native) => f.debug_tuple("Native").field(&native.name()).finish(),
            Function::Semantic(semantic) => f.debug_tuple("Semantic").field(semantic).finish(),
        }
    }
}

/// Adapts a plain closure into a [`NativeFunction`].
pub struct FnFunction<F> {
    name: String,
    description: String,
    parameters: Vec<ParameterView>,
    body: F,
}

impl<F> FnFunction<F>
where
    F: Fn(&mut ExecutionContext) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, description: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            body,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterView>) -> Self {
        self.parameters = parameters;
        self
    }
}

#[async_trait]
impl<F> NativeFunction for FnFunction<F>
where
    F: Fn(&mut ExecutionContext) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Vec<ParameterView> {
        self.parameters.clone()
    }

    async fn invoke(&self, context: &mut ExecutionContext) -> Result<()> {
        (self.body)(context)
    }
}

/// Shorthand for `Arc::new(FnFunction::new(..))`.
pub fn native_fn<F>(name: &str, description: &str, body: F) -> Arc<dyn NativeFunction>
where
    F: Fn(&mut ExecutionContext) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(FnFunction::new(name, description, body))
}
