mod google;
mod groq;

pub use google::{GoogleChat, GoogleEmbeddings};
pub use groq::GroqChat;

use crate::error::{DocumentPortalError, Result};
use async_trait::async_trait;
use log::info;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String>;
    fn model_name(&self) -> String;
    fn settings(&self) -> &LlmSettings;
    fn clone_box(&self) -> Box<dyn ChatModel>;
}

impl Clone for Box<dyn ChatModel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Groq,
}

impl FromStr for Provider {
    type Err = DocumentPortalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "google" => Ok(Provider::Google),
            "groq" => Ok(Provider::Groq),
            other => Err(DocumentPortalError::Config(format!(
                "Unsupported LLM provider: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Provider::Google => write!(f, "google"),
            Provider::Groq => write!(f, "groq"),
        }
    }
}

/// Resolved parameters for one chat client.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub provider: Provider,
    pub model_name: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

pub fn calculate_tokens(text: &str) -> usize {
    // Whitespace split; close enough for throughput logging.
    text.split_whitespace().count()
}

pub fn log_performance(
    model: &str,
    start_time: Instant,
    input_tokens: usize,
    output_tokens: usize,
) {
    let duration = start_time.elapsed();
    let total_tokens = input_tokens + output_tokens;
    let tokens_per_second = total_tokens as f64 / duration.as_secs_f64().max(f64::EPSILON);

    info!(
        "{} - Total duration: {:?}, Input tokens: {}, Output tokens: {}, Total tokens: {}, Tokens per second: {:.2}",
        model, duration, input_tokens, output_tokens, total_tokens, tokens_per_second
    );
}

/// Turns a non-success HTTP response into an upstream error carrying the body.
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DocumentPortalError::Upstream(format!(
        "{} returned {}: {}",
        provider, status, body
    )))
}
