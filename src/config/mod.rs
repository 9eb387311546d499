#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_output_formats, validate_path, validate_positive_number, validate_range,
    validate_required_secret, validate_thresholds, validate_url,
};

pub const DEFAULT_QUERY: &str = "news";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_MAX_RESULTS: usize = 30;
pub const DEFAULT_SCORER: &str = "deepseek";
pub const DEFAULT_PER_BIN: usize = 3;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FORMAT: &str = "js";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 4;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Checks shared by every provider. Runs before any network or file work.
///
/// The scorer key is not checked here: only some scorers need one, and the
/// registry reports it when the scorer is resolved.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("gnews.endpoint", config.gnews_endpoint())?;
    validate_required_secret("gnews.api_key", config.gnews_api_key())?;
    validate_range("gnews.max_results", config.max_results(), 1, 100)?;

    let thresholds = config.thresholds();
    validate_thresholds(thresholds.green_max, thresholds.yellow_max)?;

    validate_url("scorer.endpoint", config.scorer_endpoint())?;
    validate_positive_number("scorer.max_content_chars", config.max_content_chars(), 1)?;

    validate_positive_number("sampling.per_bin", config.per_bin(), 1)?;

    validate_path("output.path", config.output_path())?;
    validate_output_formats("output.formats", config.output_formats())?;

    validate_positive_number("runtime.concurrent_requests", config.concurrent_requests(), 1)?;
    validate_range(
        "runtime.request_timeout_seconds",
        config.request_timeout_seconds(),
        1,
        600,
    )?;

    Ok(())
}
