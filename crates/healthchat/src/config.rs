//! Environment-driven configuration.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, io};

use healthchat_core::knowledge::{KnowledgeBase, KnowledgeError};
use healthchat_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

/// Error returned when the configuration cannot be used.
#[derive(Debug)]
pub enum ConfigError {
    /// `HEALTHCHAT_LATENCY_MS` is not a whole number of milliseconds.
    InvalidLatency(String),
    /// The knowledge file could not be read.
    ReadKnowledge {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The knowledge file is not a valid knowledge document.
    Knowledge {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        source: KnowledgeError,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLatency(value) => {
                write!(f, "HEALTHCHAT_LATENCY_MS is not a number: {value:?}")
            }
            ConfigError::ReadKnowledge { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Knowledge { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::InvalidLatency(_) => None,
            ConfigError::ReadKnowledge { source, .. } => Some(source),
            ConfigError::Knowledge { source, .. } => Some(source),
        }
    }
}

/// Settings collected from the environment.
#[derive(Clone, Default, PartialEq)]
pub struct Config {
    /// Credential for the generative advisor. Without one the keyword
    /// analyzer answers.
    pub api_key: Option<String>,
    /// Overrides the provider's base URL.
    pub base_url: Option<String>,
    /// Overrides the provider's model.
    pub model: Option<String>,
    /// Overrides the analyzer's simulated latency.
    pub latency: Option<Duration>,
    /// JSON document replacing the built-in knowledge tables.
    pub knowledge_file: Option<PathBuf>,
}

impl Config {
    /// Reads the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Reads the configuration through `var`, which maps a variable name
    /// to its value. Blank values count as unset.
    pub fn from_vars(
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            var(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let latency = var("HEALTHCHAT_LATENCY_MS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidLatency(value))
            })
            .transpose()?;

        Ok(Self {
            api_key: var("HEALTHCHAT_API_KEY").or_else(|| var("OPENAI_API_KEY")),
            base_url: var("OPENAI_BASE_URL"),
            model: var("OPENAI_MODEL"),
            latency,
            knowledge_file: var("HEALTHCHAT_KNOWLEDGE_FILE").map(PathBuf::from),
        })
    }

    /// Loads the knowledge tables, falling back to the built-in ones.
    pub fn load_knowledge(&self) -> Result<KnowledgeBase, ConfigError> {
        let Some(path) = &self.knowledge_file else {
            return Ok(KnowledgeBase::builtin());
        };
        let json = fs::read_to_string(path).map_err(|source| {
            ConfigError::ReadKnowledge {
                path: path.clone(),
                source,
            }
        })?;
        KnowledgeBase::from_json(&json).map_err(|source| ConfigError::Knowledge {
            path: path.clone(),
            source,
        })
    }

    /// Returns the provider configuration if a credential is present.
    pub fn openai_config(&self) -> Option<OpenAIConfig> {
        let api_key = self.api_key.as_ref()?;
        let mut builder = OpenAIConfigBuilder::with_api_key(api_key);
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        if let Some(model) = &self.model {
            builder = builder.with_model(model);
        }
        Some(builder.build())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("latency", &self.latency)
            .field("knowledge_file", &self.knowledge_file)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<_, _> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_empty_environment() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.openai_config().is_none());
        assert_eq!(
            config.load_knowledge().unwrap(),
            KnowledgeBase::builtin()
        );
    }

    #[test]
    fn test_api_key_fallback() {
        let config = load(&[("OPENAI_API_KEY", "sk-openai")]).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));

        let config = config_with_both();
        assert_eq!(config.api_key.as_deref(), Some("sk-health"));
    }

    fn config_with_both() -> Config {
        load(&[
            ("HEALTHCHAT_API_KEY", "sk-health"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("OPENAI_MODEL", "  "),
        ])
        .unwrap()
    }

    #[test]
    fn test_openai_config() {
        let config = load(&[
            ("HEALTHCHAT_API_KEY", "sk-health"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
        ])
        .unwrap();
        let openai = config.openai_config().unwrap();
        assert_eq!(openai.model(), "gpt-4o-mini");
        assert_eq!(
            openai.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert!(!format!("{config:?}").contains("sk-health"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        assert_eq!(config_with_both().model, None);
    }

    #[test]
    fn test_latency() {
        let config = load(&[("HEALTHCHAT_LATENCY_MS", "250")]).unwrap();
        assert_eq!(config.latency, Some(Duration::from_millis(250)));

        let err = load(&[("HEALTHCHAT_LATENCY_MS", "fast")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLatency(ref v) if v == "fast"));
    }

    #[test]
    fn test_missing_knowledge_file() {
        let config = load(&[(
            "HEALTHCHAT_KNOWLEDGE_FILE",
            "/nonexistent/knowledge.json",
        )])
        .unwrap();
        let err = config.load_knowledge().unwrap_err();
        assert!(matches!(err, ConfigError::ReadKnowledge { .. }));
        assert!(err.source().is_some());
    }
}
