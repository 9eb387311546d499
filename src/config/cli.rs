use super::{
    validate_provider, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_LANG, DEFAULT_MAX_RESULTS,
    DEFAULT_OUTPUT_FORMAT, DEFAULT_OUTPUT_PATH, DEFAULT_PER_BIN, DEFAULT_QUERY, DEFAULT_SCORER,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::adapters::{deepseek, gnews};
use crate::core::scoring::DEFAULT_MAX_CONTENT_CHARS;
use crate::core::ConfigProvider;
use crate::domain::model::Thresholds;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::fmt;

#[derive(Clone, Parser)]
#[command(name = "headline-light")]
#[command(about = "Score news headlines for misleadingness and publish a traffic-light sample")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, env = "GNEWS_ENDPOINT", default_value = gnews::DEFAULT_ENDPOINT)]
    pub gnews_endpoint: String,

    #[arg(long, env = "GNEWS_API_KEY", default_value = "", hide_env_values = true)]
    pub gnews_api_key: String,

    #[arg(long, env = "QUERY", default_value = DEFAULT_QUERY)]
    pub query: String,

    #[arg(long, env = "GNEWS_LANG", default_value = DEFAULT_LANG)]
    pub lang: String,

    #[arg(long, env = "COUNTRY")]
    pub country: Option<String>,

    #[arg(long, env = "MAX_RESULTS", default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,

    #[arg(long, env = "GREEN_MAX", default_value_t = 33)]
    pub green_max: u8,

    #[arg(long, env = "YELLOW_MAX", default_value_t = 66)]
    pub yellow_max: u8,

    /// Scorer identifier: `deepseek`, `deepseek:<model>` or `fixed:<score>`
    #[arg(long, env = "SCORER", default_value = DEFAULT_SCORER)]
    pub scorer: String,

    #[arg(long, env = "DEEPSEEK_API_KEY", default_value = "", hide_env_values = true)]
    pub scorer_api_key: String,

    #[arg(long, env = "DEEPSEEK_ENDPOINT", default_value = deepseek::DEFAULT_ENDPOINT)]
    pub scorer_endpoint: String,

    #[arg(long, default_value_t = DEFAULT_MAX_CONTENT_CHARS)]
    pub max_content_chars: usize,

    #[arg(long, env = "PER_BIN", default_value_t = DEFAULT_PER_BIN)]
    pub per_bin: usize,

    /// Fixed seed for a reproducible sample
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "OUTPUT_PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = DEFAULT_OUTPUT_FORMAT)]
    pub output_formats: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_CONCURRENT_REQUESTS)]
    pub concurrent_requests: usize,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub request_timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Validate configuration and resolve the scorer without fetching")]
    pub dry_run: bool,
}

impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("config", &self.config)
            .field("gnews_endpoint", &self.gnews_endpoint)
            .field("gnews_api_key", &"<redacted>")
            .field("query", &self.query)
            .field("lang", &self.lang)
            .field("country", &self.country)
            .field("max_results", &self.max_results)
            .field("green_max", &self.green_max)
            .field("yellow_max", &self.yellow_max)
            .field("scorer", &self.scorer)
            .field("scorer_api_key", &"<redacted>")
            .field("scorer_endpoint", &self.scorer_endpoint)
            .field("per_bin", &self.per_bin)
            .field("seed", &self.seed)
            .field("output_path", &self.output_path)
            .field("output_formats", &self.output_formats)
            .field("concurrent_requests", &self.concurrent_requests)
            .finish_non_exhaustive()
    }
}

impl ConfigProvider for CliConfig {
    fn gnews_endpoint(&self) -> &str {
        &self.gnews_endpoint
    }

    fn gnews_api_key(&self) -> &str {
        &self.gnews_api_key
    }

    fn query(&self) -> &str {
        &self.query
    }

    fn lang(&self) -> &str {
        &self.lang
    }

    fn country(&self) -> Option<&str> {
        self.country.as_deref().filter(|c| !c.trim().is_empty())
    }

    fn max_results(&self) -> usize {
        self.max_results
    }

    fn thresholds(&self) -> Thresholds {
        Thresholds {
            green_max: self.green_max,
            yellow_max: self.yellow_max,
        }
    }

    fn scorer_identifier(&self) -> &str {
        &self.scorer
    }

    fn scorer_api_key(&self) -> &str {
        &self.scorer_api_key
    }

    fn scorer_endpoint(&self) -> &str {
        &self.scorer_endpoint
    }

    fn max_content_chars(&self) -> usize {
        self.max_content_chars
    }

    fn per_bin(&self) -> usize {
        self.per_bin
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
