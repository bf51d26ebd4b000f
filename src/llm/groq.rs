use super::{calculate_tokens, ensure_success, log_performance};
use super::{ChatModel, LlmSettings};
use crate::error::{DocumentPortalError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Instant;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Clone)]
pub struct GroqChat {
    api_key: String,
    settings: LlmSettings,
    client: Client,
    url: String,
}

impl GroqChat {
    pub fn new(api_key: &str, settings: LlmSettings) -> Self {
        GroqChat {
            api_key: api_key.to_string(),
            settings,
            client: Client::new(),
            url: GROQ_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> String {
        format!("Groq ({})", self.settings.model_name)
    }
}

#[async_trait]
impl ChatModel for GroqChat {
    fn clone_box(&self) -> Box<dyn ChatModel> {
        Box::new(self.clone())
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        let input_tokens = calculate_tokens(prompt);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.settings.model_name,
                "temperature": self.settings.temperature,
                "max_tokens": self.settings.max_output_tokens,
                "messages": [
                    {"role": "user", "content": prompt}
                ]
            }))
            .send()
            .await?;
        let response = ensure_success("Groq", response)
            .await?
            .json::<serde_json::Value>()
            .await?;

        let output = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                DocumentPortalError::Upstream("Groq response had no message content".to_string())
            })?
            .to_string();
        let output_tokens = calculate_tokens(&output);

        log_performance(&self.model_name(), start_time, input_tokens, output_tokens);

        Ok(output)
    }

    fn model_name(&self) -> String {
        self.model_name()
    }

    fn settings(&self) -> &LlmSettings {
        &self.settings
    }
}
