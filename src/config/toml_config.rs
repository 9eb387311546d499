use super::{
    validate_provider, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_LANG, DEFAULT_MAX_RESULTS,
    DEFAULT_OUTPUT_FORMAT, DEFAULT_OUTPUT_PATH, DEFAULT_PER_BIN, DEFAULT_QUERY, DEFAULT_SCORER,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::adapters::{deepseek, gnews};
use crate::core::scoring::DEFAULT_MAX_CONTENT_CHARS;
use crate::core::ConfigProvider;
use crate::domain::model::Thresholds;
use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::Validate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// File-based configuration. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub gnews: GNewsSection,
    pub thresholds: Thresholds,
    pub scorer: ScorerSection,
    pub sampling: SamplingSection,
    pub output: OutputSection,
    pub runtime: RuntimeSection,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GNewsSection {
    pub endpoint: String,
    pub api_key: String,
    pub query: String,
    pub lang: String,
    pub country: Option<String>,
    pub max_results: usize,
}

impl Default for GNewsSection {
    fn default() -> Self {
        Self {
            endpoint: gnews::DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            query: DEFAULT_QUERY.to_string(),
            lang: DEFAULT_LANG.to_string(),
            country: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl std::fmt::Debug for GNewsSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GNewsSection")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("query", &self.query)
            .field("lang", &self.lang)
            .field("country", &self.country)
            .field("max_results", &self.max_results)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerSection {
    pub identifier: String,
    pub api_key: String,
    pub endpoint: String,
    pub max_content_chars: usize,
}

impl Default for ScorerSection {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_SCORER.to_string(),
            api_key: String::new(),
            endpoint: deepseek::DEFAULT_ENDPOINT.to_string(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl std::fmt::Debug for ScorerSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScorerSection")
            .field("identifier", &self.identifier)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("max_content_chars", &self.max_content_chars)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSection {
    pub per_bin: usize,
    pub seed: Option<u64>,
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            per_bin: DEFAULT_PER_BIN,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub path: String,
    pub formats: Vec<String>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            formats: vec![DEFAULT_OUTPUT_FORMAT.to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    pub concurrent_requests: usize,
    pub request_timeout_seconds: u64,
    pub monitor: bool,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            request_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            monitor: false,
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PipelineError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PipelineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| {
                    tracing::warn!(variable = var_name, "Environment variable not set");
                    format!("${{{}}}", var_name)
                })
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.runtime.monitor
    }
}

impl ConfigProvider for TomlConfig {
    fn gnews_endpoint(&self) -> &str {
        &self.gnews.endpoint
    }

    fn gnews_api_key(&self) -> &str {
        &self.gnews.api_key
    }

    fn query(&self) -> &str {
        &self.gnews.query
    }

    fn lang(&self) -> &str {
        &self.gnews.lang
    }

    fn country(&self) -> Option<&str> {
        self.gnews.country.as_deref().filter(|c| !c.trim().is_empty())
    }

    fn max_results(&self) -> usize {
        self.gnews.max_results
    }

    fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    fn scorer_identifier(&self) -> &str {
        &self.scorer.identifier
    }

    fn scorer_api_key(&self) -> &str {
        &self.scorer.api_key
    }

    fn scorer_endpoint(&self) -> &str {
        &self.scorer.endpoint
    }

    fn max_content_chars(&self) -> usize {
        self.scorer.max_content_chars
    }

    fn per_bin(&self) -> usize {
        self.sampling.per_bin
    }

    fn seed(&self) -> Option<u64> {
        self.sampling.seed
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn concurrent_requests(&self) -> usize {
        self.runtime.concurrent_requests
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.runtime.request_timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
