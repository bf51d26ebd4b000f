pub mod env;

pub use env::EnvSettings;

use crate::error::{DocumentPortalError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub embedding_model: Option<EmbeddingModelConfig>,
    #[serde(default)]
    pub llm: BTreeMap<String, LlmBlock>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EmbeddingModelConfig {
    pub provider: Option<String>,
    pub model_name: Option<String>,
}

/// One entry under `llm:`, keyed by the selector `LLM_PROVIDER` matches against.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LlmBlock {
    pub provider: Option<String>,
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str =
            fs::read_to_string(path).map_err(|e| DocumentPortalError::io(path, e))?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(source)?;
        Ok(config)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.embedding_model.is_some() {
            keys.push("embedding_model");
        }
        if !self.llm.is_empty() {
            keys.push("llm");
        }
        keys
    }

    pub fn embedding_model_name(&self) -> Result<&str> {
        self.embedding_model
            .as_ref()
            .and_then(|block| block.model_name.as_deref())
            .ok_or_else(|| {
                DocumentPortalError::Config(
                    "missing config key: embedding_model.model_name".to_string(),
                )
            })
    }

    pub fn llm_block(&self, key: &str) -> Result<&LlmBlock> {
        self.llm.get(key).ok_or_else(|| {
            DocumentPortalError::Config(format!("Provider '{}' not found in config", key))
        })
    }
}
