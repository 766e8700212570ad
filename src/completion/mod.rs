pub mod human;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;

use crate::function::CompletionSettings;

/// Turns a rendered prompt into text. Could be a human, a model, or a test script.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str, settings: &CompletionSettings) -> Result<String>;
}
