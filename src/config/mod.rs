use crate::core::error::ChatError;
use crate::providers::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Provide clear, concise, and accurate responses.";

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Groq,
    OpenRouter,
    HuggingFace,
    OpenAI,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Groq,
        Provider::OpenRouter,
        Provider::HuggingFace,
        Provider::OpenAI,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenRouter => "openrouter",
            Provider::HuggingFace => "huggingface",
            Provider::OpenAI => "openai",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Provider::ALL.iter().map(|p| p.as_str()).collect();
                ChatError::Configuration(format!(
                    "Unsupported provider: {} (expected one of {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Per-provider settings as written in the config file. Every field is
/// optional; gaps are filled from the environment and the provider profile.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub active_provider: Option<Provider>,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub providers: HashMap<Provider, ProviderEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_provider: None,
            system_prompt: default_system_prompt(),
            timeout_secs: None,
            providers: HashMap::new(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatrelay")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_dir() -> PathBuf {
        Self::config_dir().join("history")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    pub fn load() -> Result<Config, ChatError> {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`, writing a default file there if none exists.
    pub fn load_from(path: &Path) -> Result<Config, ChatError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config = serde_yml::from_str::<Config>(&contents).map_err(|e| {
                ChatError::Configuration(format!("Parse {}: {}", path.display(), e))
            })?;
            debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let config = Config::default();
        if let Err(e) = config.save_to(path) {
            warn!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Resolve the dispatch-time settings for `provider` (or the active
    /// provider), reading credentials from the process environment.
    pub fn resolve(
        &self,
        provider: Option<Provider>,
        model: Option<&str>,
    ) -> Result<ProviderConfig, ChatError> {
        self.resolve_with(provider, model, |name| std::env::var(name).ok())
    }

    /// Precedence: explicit argument, then config file, then profile default.
    /// The credential comes from the file first, then the provider's
    /// environment variable.
    pub fn resolve_with<F>(
        &self,
        provider: Option<Provider>,
        model: Option<&str>,
        env: F,
    ) -> Result<ProviderConfig, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = provider.or(self.active_provider).unwrap_or_default();
        let profile = provider.profile();
        let entry = self.providers.get(&provider).cloned().unwrap_or_default();

        let model = non_blank(model.map(str::to_string))
            .or(non_blank(entry.model))
            .unwrap_or_else(|| profile.default_model.to_string());
        let endpoint =
            non_blank(entry.endpoint).unwrap_or_else(|| profile.endpoint_for(&model));
        let credential = non_blank(entry.api_key)
            .or_else(|| non_blank(env(profile.api_key_env)))
            .unwrap_or_default();

        let config = ProviderConfig {
            provider,
            endpoint,
            model,
            credential,
        };
        config.ensure_credential()?;
        Ok(config)
    }
}
