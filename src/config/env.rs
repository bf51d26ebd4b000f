use log::debug;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

pub const DATA_STORAGE_PATH: &str = "DATA_STORAGE_PATH";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const LLM_PROVIDER: &str = "LLM_PROVIDER";

pub const DEFAULT_LLM_PROVIDER: &str = "groq";

const TRACKED_VARS: [&str; 4] = [DATA_STORAGE_PATH, GOOGLE_API_KEY, GROQ_API_KEY, LLM_PROVIDER];

/// Snapshot of the environment variables the portal reads.
///
/// Taken once at startup and passed to whoever needs it, so nothing
/// downstream reads process state on its own.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    vars: HashMap<String, String>,
}

impl EnvSettings {
    /// Loads `.env` if present, then captures the tracked variables.
    pub fn from_process() -> Self {
        if dotenv::dotenv().is_ok() {
            debug!("Loaded variables from .env");
        }
        let vars = TRACKED_VARS
            .iter()
            .filter_map(|name| env::var(name).ok().map(|value| (name.to_string(), value)))
            .collect();
        EnvSettings { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EnvSettings {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value only when it is set and non-empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn llm_provider(&self) -> &str {
        self.get(LLM_PROVIDER).unwrap_or(DEFAULT_LLM_PROVIDER)
    }

    pub fn data_root(&self) -> PathBuf {
        self.get(DATA_STORAGE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("data")
            })
    }
}
