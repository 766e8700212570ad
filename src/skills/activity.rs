//! `RandomActivity.GetRandomActivity`: asks a public API for something to do.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;

use crate::context::ExecutionContext;
use crate::function::NativeFunction;

/// Response body of the activity API. Only `activity` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub activity: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub participants: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub accessibility: Option<f64>,
}

/// Extract the activity name from an API response body.
pub fn parse_activity(body: &str) -> Result<String> {
    let activity: Activity = serde_json::from_str(body).context("invalid activity response")?;
    if activity.activity.trim().is_empty() {
        bail!("activity response has an empty activity");
    }
    Ok(activity.activity)
}

/// Fetches one activity per call and stores it in `RESULT`.
pub struct RandomActivity {
    client: reqwest::Client,
    url: String,
}

impl RandomActivity {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skein/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?;

        let status = response.status();
        let body = response.text().await.context("failed to read response body")?;
        if !status.is_success() {
            bail!("activity API returned {}: {}", status, body);
        }
        Ok(body)
    }
}

#[async_trait]
impl NativeFunction for RandomActivity {
    fn name(&self) -> &str {
        "GetRandomActivity"
    }

    fn description(&self) -> &str {
        "Gets a random activity from an API"
    }

    async fn invoke(&self, context: &mut ExecutionContext) -> Result<()> {
        if context.is_cancelled() {
            return Ok(());
        }
        let body = self.fetch().await?;
        // A stop requested during the request wins over its answer.
        if context.is_cancelled() {
            return Ok(());
        }
        context.set_result(parse_activity(&body)?);
        Ok(())
    }
}
