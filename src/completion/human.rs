use anyhow::{Result, bail};
use async_trait::async_trait;
use std::io::{self, Write};

use super::TextCompletion;
use crate::function::CompletionSettings;

/// You are the model. The prompt is printed and you type the completion.
pub struct HumanCompletion;

impl HumanCompletion {
    fn read_line(prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

#[async_trait]
impl TextCompletion for HumanCompletion {
    async fn complete(&self, prompt: &str, settings: &CompletionSettings) -> Result<String> {
        println!("\n{}", "=".repeat(60));
        println!("{}", prompt);
        println!(
            "{} (max_tokens={}, temperature={}, top_p={})",
            "-".repeat(20),
            settings.max_tokens,
            settings.temperature,
            settings.top_p
        );
        println!("{}", "=".repeat(60));

        let answer = Self::read_line("Completion: ")?;
        if answer.is_empty() {
            bail!("no completion entered");
        }
        Ok(answer)
    }
}
