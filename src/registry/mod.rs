pub mod loader;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::KernelError;
use crate::function::{
    CompletionSettings, Function, FunctionDescriptor, FunctionKind, NativeFunction,
    ParameterView, SemanticFunction, is_valid_name,
};

/// A descriptor together with the function it describes.
#[derive(Debug, Clone)]
pub struct RegisteredFunction {
    pub descriptor: FunctionDescriptor,
    pub function: Function,
}

impl RegisteredFunction {
    pub fn kind(&self) -> FunctionKind {
        self.function.kind()
    }
}

/// Holds every registered function, keyed by (collection, name).
///
/// Lookups ignore case. Registration takes `&mut self`: fill the registry at
/// startup, then share it behind an `Arc` for lock-free reads.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<(String, String), RegisteredFunction>,
}

fn key(collection: &str, name: &str) -> (String, String) {
    (collection.to_ascii_lowercase(), name.to_ascii_lowercase())
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function. Never overwrites: a taken (collection, name) is an
    /// error and the existing entry stays.
    pub fn register(
        &mut self,
        descriptor: FunctionDescriptor,
        function: Function,
    ) -> Result<(), KernelError> {
        for name in [&descriptor.collection, &descriptor.name] {
            if !is_valid_name(name) {
                return Err(KernelError::InvalidName(name.clone()));
            }
        }

        let key = key(&descriptor.collection, &descriptor.name);
        if self.functions.contains_key(&key) {
            return Err(KernelError::DuplicateFunction {
                collection: descriptor.collection,
                name: descriptor.name,
            });
        }

        tracing::debug!(function = %descriptor, kind = ?function.kind(), "registered");
        self.functions.insert(
            key,
            RegisteredFunction {
                descriptor,
                function,
            },
        );
        Ok(())
    }

    pub fn register_native(
        &mut self,
        collection: &str,
        function: Arc<dyn NativeFunction>,
    ) -> Result<(), KernelError> {
        let descriptor = FunctionDescriptor {
            collection: collection.to_string(),
            name: function.name().to_string(),
            description: function.description().to_string(),
            parameters: function.parameters(),
        };
        self.register(descriptor, Function::Native(function))
    }

    /// Parse `template` and register it as a semantic function.
    pub fn register_semantic(
        &mut self,
        collection: &str,
        name: &str,
        description: &str,
        template: &str,
        settings: CompletionSettings,
    ) -> Result<(), KernelError> {
        self.register_semantic_with(collection, name, description, template, settings, &[])
    }

    /// Like [`register_semantic`](Self::register_semantic), with parameter
    /// descriptions and defaults for the template's variables.
    pub fn register_semantic_with(
        &mut self,
        collection: &str,
        name: &str,
        description: &str,
        template: &str,
        settings: CompletionSettings,
        declared: &[ParameterView],
    ) -> Result<(), KernelError> {
        let function = SemanticFunction::new(template, settings)?;
        let descriptor = FunctionDescriptor {
            collection: collection.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            parameters: function.parameters(declared),
        };
        self.register(descriptor, Function::Semantic(function))
    }

    /// Register a group of native functions under one collection.
    /// Stops at the first conflict; functions registered before it stay.
    pub fn import_skill<I>(&mut self, collection: &str, functions: I) -> Result<usize, KernelError>
    where
        I: IntoIterator<Item = Arc<dyn NativeFunction>>,
    {
        let mut count = 0;
        for function in functions {
            self.register_native(collection, function)?;
            count += 1;
        }
        tracing::info!(collection, count, "imported skill");
        Ok(count)
    }

    pub fn lookup(&self, collection: &str, name: &str) -> Result<&RegisteredFunction, KernelError> {
        self.functions
            .get(&key(collection, name))
            .ok_or_else(|| KernelError::FunctionNotFound {
                collection: collection.to_string(),
                name: name.to_string(),
            })
    }

    pub fn has(&self, collection: &str, name: &str) -> bool {
        self.functions.contains_key(&key(collection, name))
    }

    pub fn has_native(&self, collection: &str, name: &str) -> bool {
        self.kind_of(collection, name) == Some(FunctionKind::Native)
    }

    pub fn has_semantic(&self, collection: &str, name: &str) -> bool {
        self.kind_of(collection, name) == Some(FunctionKind::Semantic)
    }

    fn kind_of(&self, collection: &str, name: &str) -> Option<FunctionKind> {
        self.functions
            .get(&key(collection, name))
            .map(RegisteredFunction::kind)
    }

    /// Every descriptor, ordered by collection then name (case-insensitive).
    pub fn descriptors(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.values().map(|entry| &entry.descriptor)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
