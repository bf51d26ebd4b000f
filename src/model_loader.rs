use crate::config::env::{GOOGLE_API_KEY, GROQ_API_KEY};
use crate::config::{Config, EnvSettings};
use crate::error::{DocumentPortalError, Result};
use crate::llm::{
    ChatModel, GoogleChat, GoogleEmbeddings, GroqChat, LlmSettings, Provider,
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE,
};
use log::{error, info};
use std::fmt;
use std::path::Path;

const REQUIRED_VARS: [&str; 2] = [GOOGLE_API_KEY, GROQ_API_KEY];

#[derive(Clone)]
struct ApiKeys {
    google: String,
    groq: String,
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("google", &"<redacted>")
            .field("groq", &"<redacted>")
            .finish()
    }
}

/// Builds embedding and chat clients from config plus credentials.
///
/// Credentials are checked once, at construction. Clients are rebuilt on
/// every `load_*` call and nothing is cached.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    config: Config,
    api_keys: ApiKeys,
    provider_key: String,
}

impl ModelLoader {
    pub fn new(config: Config, env: &EnvSettings) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| env.get(name).is_none())
            .collect();

        if !missing.is_empty() {
            error!("Missing environment variables: missing_vars={:?}", missing);
            return Err(DocumentPortalError::Config(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }
        info!("Environment variables validated: available_keys={:?}", REQUIRED_VARS);

        let api_keys = ApiKeys {
            google: env.get(GOOGLE_API_KEY).unwrap_or_default().to_string(),
            groq: env.get(GROQ_API_KEY).unwrap_or_default().to_string(),
        };

        info!("Configuration loaded successfully: config_keys={:?}", config.keys());
        Ok(ModelLoader {
            config,
            api_keys,
            provider_key: env.llm_provider().to_string(),
        })
    }

    pub fn from_path(config_path: impl AsRef<Path>, env: &EnvSettings) -> Result<Self> {
        let config = Config::load(config_path)?;
        Self::new(config, env)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_embeddings(&self) -> Result<GoogleEmbeddings> {
        info!("Loading embedding model...");
        let model_name = self.config.embedding_model_name().map_err(|e| {
            error!("Error loading embedding model: error={}", e);
            e
        })?;
        Ok(GoogleEmbeddings::new(&self.api_keys.google, model_name))
    }

    /// Resolves the selected `llm` block into concrete client settings.
    pub fn resolve_llm_settings(&self) -> Result<LlmSettings> {
        info!("Loading LLM...");
        let block = self.config.llm_block(&self.provider_key).map_err(|e| {
            error!("LLM provider not found in config: provider_key={}", self.provider_key);
            e
        })?;

        let provider_name = block.provider.as_deref().unwrap_or_default();
        let provider: Provider = provider_name.parse().map_err(|e| {
            error!("Unsupported LLM provider: provider={}", provider_name);
            e
        })?;

        let model_name = block.model_name.clone().ok_or_else(|| {
            DocumentPortalError::Config(format!(
                "missing config key: llm.{}.model_name",
                self.provider_key
            ))
        })?;

        let settings = LlmSettings {
            provider,
            model_name,
            temperature: block.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_output_tokens: block.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        };
        info!(
            "Loading LLM: provider={}, model={}, temperature={}, max_tokens={}",
            settings.provider, settings.model_name, settings.temperature, settings.max_output_tokens
        );
        Ok(settings)
    }

    pub fn load_llm(&self) -> Result<Box<dyn ChatModel>> {
        let settings = self.resolve_llm_settings()?;
        let llm: Box<dyn ChatModel> = match settings.provider {
            Provider::Google => Box::new(GoogleChat::new(&self.api_keys.google, settings)),
            Provider::Groq => Box::new(GroqChat::new(&self.api_keys.groq, settings)),
        };
        Ok(llm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::LLM_PROVIDER;

    fn full_env() -> EnvSettings {
        EnvSettings::from_pairs([(GOOGLE_API_KEY, "g-key"), (GROQ_API_KEY, "q-key")])
    }

    fn config(yaml: &str) -> Config {
        Config::from_yaml(yaml).unwrap()
    }

    #[test]
    fn missing_credentials_fail_construction() {
        let env = EnvSettings::from_pairs([(GOOGLE_API_KEY, "g-key")]);
        let err = ModelLoader::new(Config::default(), &env).unwrap_err();
        assert!(matches!(err, DocumentPortalError::Config(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
        assert!(!err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn lists_every_missing_credential() {
        let err = ModelLoader::new(Config::default(), &EnvSettings::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("GOOGLE_API_KEY"));
        assert!(message.contains("GROQ_API_KEY"));
    }

    #[test]
    fn groq_block_selected_by_default() {
        let loader = ModelLoader::new(
            config("llm:\n  groq:\n    provider: groq\n    model_name: X\n    temperature: 0.1\n"),
            &full_env(),
        )
        .unwrap();

        let llm = loader.load_llm().unwrap();
        assert_eq!(
            llm.settings(),
            &LlmSettings {
                provider: Provider::Groq,
                model_name: "X".to_string(),
                temperature: 0.1,
                max_output_tokens: 2048,
            }
        );
        assert_eq!(llm.model_name(), "Groq (X)");
    }

    #[test]
    fn env_override_selects_google_block() {
        let mut pairs = vec![(GOOGLE_API_KEY, "g-key"), (GROQ_API_KEY, "q-key")];
        pairs.push((LLM_PROVIDER, "google"));
        let loader = ModelLoader::new(
            config("llm:\n  google:\n    provider: google\n    model_name: gemini-2.0-flash\n"),
            &EnvSettings::from_pairs(pairs),
        )
        .unwrap();

        let llm = loader.load_llm().unwrap();
        assert_eq!(llm.settings().provider, Provider::Google);
        assert_eq!(llm.settings().temperature, DEFAULT_TEMPERATURE);
        assert_eq!(llm.model_name(), "Gemini (gemini-2.0-flash)");
    }

    #[test]
    fn unknown_provider_value_is_rejected() {
        let loader = ModelLoader::new(
            config("llm:\n  groq:\n    provider: openai\n    model_name: gpt-4o\n"),
            &full_env(),
        )
        .unwrap();

        let err = loader.load_llm().err().unwrap();
        assert!(err.to_string().contains("Unsupported LLM provider: openai"));
    }

    #[test]
    fn selector_missing_from_config() {
        let loader = ModelLoader::new(
            config("llm:\n  google:\n    provider: google\n    model_name: m\n"),
            &full_env(),
        )
        .unwrap();

        let err = loader.load_llm().err().unwrap();
        assert!(err.to_string().contains("Provider 'groq' not found in config"));
    }

    #[test]
    fn embeddings_need_model_name() {
        let loader = ModelLoader::new(config("llm: {}"), &full_env()).unwrap();
        assert!(loader.load_embeddings().is_err());

        let loader = ModelLoader::new(
            config("embedding_model:\n  model_name: models/text-embedding-004\n"),
            &full_env(),
        )
        .unwrap();
        assert_eq!(
            loader.load_embeddings().unwrap().model(),
            "models/text-embedding-004"
        );
    }
}
