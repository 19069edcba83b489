//! Chat-completion client used to generate styling recommendations.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Completions can take a while; the request timeout layer still applies.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl AdvisorConfig {
    /// Load advisor settings from environment variables.
    ///
    /// | Env Var           | Default                     |
    /// |-------------------|-----------------------------|
    /// | `OPENAI_API_KEY`  | empty                       |
    /// | `OPENAI_API_BASE` | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`    | `gpt-4`                     |
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_base: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("Advisor API key is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Advisor returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Advisor returned no completion")]
    EmptyResponse,
}

/// Produces free-text styling advice for a prompt.
#[async_trait]
pub trait StyleAdvisor: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AdvisorError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Trimmed content of the first choice.
fn first_completion(response: ChatResponse) -> Result<String, AdvisorError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(AdvisorError::EmptyResponse)
}

/// OpenAI-compatible `chat/completions` client.
pub struct OpenAiAdvisor {
    config: AdvisorConfig,
    client: reqwest::Client,
}

impl OpenAiAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }
}

#[async_trait]
impl StyleAdvisor for OpenAiAdvisor {
    async fn complete(&self, prompt: &str) -> Result<String, AdvisorError> {
        if self.config.api_key.is_empty() {
            return Err(AdvisorError::NotConfigured);
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "model": self.config.model,
                "messages": [{"role": "user", "content": prompt}],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdvisorError::HttpStatus(response.status().as_u16()));
        }

        let body: ChatResponse = response.json().await?;
        first_completion(body)
    }
}
