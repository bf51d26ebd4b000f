use super::{calculate_tokens, ensure_success, log_performance};
use super::{ChatModel, LlmSettings};
use crate::error::{DocumentPortalError, Result};
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde_json::json;
use std::time::Instant;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini model paths are `models/<name>`; config may give either form.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[derive(Clone)]
pub struct GoogleChat {
    api_key: String,
    settings: LlmSettings,
    client: Client,
    url: String,
}

impl GoogleChat {
    pub fn new(api_key: &str, settings: LlmSettings) -> Self {
        GoogleChat {
            api_key: api_key.to_string(),
            settings,
            client: Client::new(),
            url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> String {
        format!("Gemini ({})", self.settings.model_name)
    }
}

#[async_trait]
impl ChatModel for GoogleChat {
    fn clone_box(&self) -> Box<dyn ChatModel> {
        Box::new(self.clone())
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        let input_tokens = calculate_tokens(prompt);

        let response = self
            .client
            .post(format!(
                "{}/{}:generateContent",
                self.url,
                model_path(&self.settings.model_name)
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [
                    {"role": "user", "parts": [{"text": prompt}]}
                ],
                "generationConfig": {
                    "temperature": self.settings.temperature,
                    "maxOutputTokens": self.settings.max_output_tokens
                }
            }))
            .send()
            .await?;
        let response = ensure_success("Gemini", response)
            .await?
            .json::<serde_json::Value>()
            .await?;

        let parts = response["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                DocumentPortalError::Upstream("Gemini response had no candidates".to_string())
            })?;
        let output: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();
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

/// Gemini `embedContent` client.
#[derive(Clone)]
pub struct GoogleEmbeddings {
    api_key: String,
    model: String,
    client: Client,
    url: String,
}

impl GoogleEmbeddings {
    pub fn new(api_key: &str, model: &str) -> Self {
        GoogleEmbeddings {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Client::new(),
            url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let model = model_path(&self.model);
        let response = self
            .client
            .post(format!("{}/{}:embedContent", self.url, model))
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "model": model,
                "content": {"parts": [{"text": text}]}
            }))
            .send()
            .await?;
        let response = ensure_success("Gemini embeddings", response)
            .await?
            .json::<serde_json::Value>()
            .await?;

        let values = response["embedding"]["values"].as_array().ok_or_else(|| {
            DocumentPortalError::Upstream("embedding response had no values".to_string())
        })?;
        let embedding: Vec<f32> = values
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        info!("Embedded query: model={}, dimensions={}", self.model, embedding.len());
        Ok(embedding)
    }
}
