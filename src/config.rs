use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::LevelFilter;

use crate::ai::client::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerationClient, ModelConfig,
    OpenRouterClient, UnconfiguredClient,
};
use crate::ai::gemini::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, GeminiClient, GeminiConfig};
use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DOCUMENTS_DIR: &str = "documents";
pub const DEFAULT_LOG_FILE: &str = "study_buddy.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    OpenRouter,
    Gemini,
}

impl Provider {
    pub fn key_var(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "gemini" => Ok(Provider::Gemini),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub documents_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("STUDY_BUDDY_PROVIDER") {
            Some(value) => value.parse()?,
            None => Provider::default(),
        };
        let model = var("STUDY_BUDDY_MODEL").unwrap_or_else(|| match provider {
            Provider::OpenRouter => DEFAULT_MODEL.to_string(),
            Provider::Gemini => GEMINI_DEFAULT_MODEL.to_string(),
        });

        let temperature = parse_or(
            "STUDY_BUDDY_TEMPERATURE",
            var("STUDY_BUDDY_TEMPERATURE"),
            DEFAULT_TEMPERATURE,
        )?;
        let max_tokens = parse_or(
            "STUDY_BUDDY_MAX_TOKENS",
            var("STUDY_BUDDY_MAX_TOKENS"),
            DEFAULT_MAX_TOKENS,
        )?;
        let timeout_secs = parse_or(
            "STUDY_BUDDY_TIMEOUT_SECS",
            var("STUDY_BUDDY_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let log_level = parse_or(
            "STUDY_BUDDY_LOG_LEVEL",
            var("STUDY_BUDDY_LOG_LEVEL"),
            LevelFilter::Info,
        )?;

        Ok(Self {
            provider,
            api_key: var(provider.key_var()),
            model,
            temperature,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
            documents_dir: var("STUDY_BUDDY_DOCUMENTS_DIR")
                .unwrap_or_else(|| DEFAULT_DOCUMENTS_DIR.to_string())
                .into(),
            log_file: var("STUDY_BUDDY_LOG_FILE")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            log_level,
        })
    }

    pub fn generation_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn status_line(&self) -> String {
        if self.generation_enabled() {
            format!("AI: Enabled ({})", self.model)
        } else {
            format!("AI: Disabled - Set {}", self.provider.key_var())
        }
    }

    /// Builds the configured collaborator. A missing key or a failed client
    /// construction yields a client that reports the problem on every call.
    pub fn build_client(&self) -> Arc<dyn GenerationClient> {
        let Some(api_key) = self.api_key.clone() else {
            let reason = format!("{} is not set", self.provider.key_var());
            log::warn!("generation disabled: {}", reason);
            return Arc::new(UnconfiguredClient { reason });
        };

        match self.provider {
            Provider::OpenRouter => {
                let config = ModelConfig {
                    model: self.model.clone(),
                    temperature: Some(self.temperature),
                    max_tokens: Some(self.max_tokens),
                };
                match OpenRouterClient::new(config) {
                    Ok(client) => Arc::new(client),
                    Err(e) => {
                        log::error!("{}", e);
                        Arc::new(UnconfiguredClient {
                            reason: e.to_string(),
                        })
                    }
                }
            }
            Provider::Gemini => {
                let config = GeminiConfig {
                    base_url: GEMINI_BASE_URL.to_string(),
                    api_key,
                    model: self.model.clone(),
                    temperature: Some(self.temperature),
                    max_tokens: Some(self.max_tokens),
                    timeout: self.timeout,
                };
                match GeminiClient::new(config) {
                    Ok(client) => Arc::new(client),
                    Err(e) => {
                        log::error!("{}", e);
                        Arc::new(UnconfiguredClient {
                            reason: e.to_string(),
                        })
                    }
                }
            }
        }
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
