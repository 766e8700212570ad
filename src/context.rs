//! The variable bag threaded through one pipeline run.
//!
//! Variable names are case-insensitive: keys are stored upper-cased, so
//! `Item1` and `ITEM1` address the same slot. Cancellation is a shared flag so
//! the calling boundary (a timeout, Ctrl+C) can request a stop while the run
//! owns the context. Once set it stays set.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::consts::{INPUT_VARIABLE, RESULT_VARIABLE};
use crate::error::KernelError;

/// Requests a cooperative stop of the run that owns the matching context.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Mutable state for a single run. Never shared between runs.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    variables: HashMap<String, String>,
    last_error: Option<KernelError>,
    cancel: CancelHandle,
}

fn normalize(key: &str) -> String {
    key.to_ascii_uppercase()
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with `INPUT` set.
    pub fn with_input(input: impl Into<String>) -> Self {
        let mut context = Self::new();
        context.set(INPUT_VARIABLE, input);
        context
    }

    pub fn from_variables<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut context = Self::new();
        for (key, value) in variables {
            context.set(key.as_ref(), value);
        }
        context
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(&normalize(key)).map(String::as_str)
    }

    /// Look up `key`, falling back to `default` when it is unset.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Set a variable, overwriting any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.variables.insert(normalize(key), value.into());
    }

    pub fn input(&self) -> Option<&str> {
        self.get(INPUT_VARIABLE)
    }

    pub fn result(&self) -> Option<&str> {
        self.get(RESULT_VARIABLE)
    }

    pub fn set_result(&mut self, value: impl Into<String>) {
        self.set(RESULT_VARIABLE, value);
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    pub fn into_variables(self) -> HashMap<String, String> {
        self.variables
    }

    /// Record the terminal error and stop the run. The first error wins.
    pub fn fail(&mut self, error: KernelError) {
        if self.last_error.is_none() {
            self.last_error = Some(error);
        }
        self.cancel.cancel();
    }

    /// Request a cooperative stop without recording an error.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn error(&self) -> Option<&KernelError> {
        self.last_error.as_ref()
    }

    pub fn has_failed(&self) -> bool {
        self.last_error.is_some()
    }

    /// A handle that cancels this context from outside the run.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// The processed result, or the error that ended the run.
    /// A run that produced no `RESULT` yields an empty string.
    pub fn outcome(&self) -> Result<&str, &KernelError> {
        match &self.last_error {
            Some(err) => Err(err),
            None => Ok(self.result().unwrap_or_default()),
        }
    }
}
