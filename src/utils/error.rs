use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("Scorer returned a non-numeric value of kind {kind}")]
    InvalidScoreKind { kind: String },

    #[error("No scorer registered under '{identifier}'")]
    ScorerNotFound { identifier: String },

    #[error("Scorer '{identifier}' violates the score(title, content) contract: {reason}")]
    ScorerContractViolation { identifier: String, reason: String },

    #[error("Scoring unavailable: {message}")]
    ScoringUnavailable { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Scoring,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::ApiError(_) => ErrorCategory::Network,
            PipelineError::IoError(_) => ErrorCategory::System,
            PipelineError::SerializationError(_)
            | PipelineError::MalformedRecord { .. }
            | PipelineError::ProcessingError { .. } => ErrorCategory::Data,
            PipelineError::ConfigError { .. }
            | PipelineError::MissingConfigError { .. }
            | PipelineError::InvalidConfigValueError { .. }
            | PipelineError::ConfigValidationError { .. }
            | PipelineError::ScorerNotFound { .. }
            | PipelineError::ScorerContractViolation { .. } => ErrorCategory::Configuration,
            PipelineError::InvalidScoreKind { .. } | PipelineError::ScoringUnavailable { .. } => {
                ErrorCategory::Scoring
            }
        }
    }

    /// Per-article problems are `Low`: they are skipped or degraded and the run continues.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PipelineError::MalformedRecord { .. }
            | PipelineError::InvalidScoreKind { .. }
            | PipelineError::ScoringUnavailable { .. } => ErrorSeverity::Low,
            PipelineError::ApiError(_) => ErrorSeverity::Medium,
            PipelineError::SerializationError(_) | PipelineError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            PipelineError::IoError(_)
            | PipelineError::ConfigError { .. }
            | PipelineError::MissingConfigError { .. }
            | PipelineError::InvalidConfigValueError { .. }
            | PipelineError::ConfigValidationError { .. }
            | PipelineError::ScorerNotFound { .. }
            | PipelineError::ScorerContractViolation { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PipelineError::ApiError(_) => {
                "Check network connectivity, the API endpoint and the API key, then retry"
            }
            PipelineError::IoError(_) => "Check that the output directory exists and is writable",
            PipelineError::SerializationError(_) => {
                "The upstream response could not be (de)serialized; inspect it with --verbose"
            }
            PipelineError::MissingConfigError { .. } => {
                "Provide the missing value via flag, environment variable or config file"
            }
            PipelineError::InvalidConfigValueError { .. }
            | PipelineError::ConfigValidationError { .. }
            | PipelineError::ConfigError { .. } => "Fix the configuration value and run again",
            PipelineError::ScorerNotFound { .. } => {
                "Use a registered scorer identifier such as 'deepseek' or 'fixed:<score>'"
            }
            PipelineError::ScorerContractViolation { .. } => {
                "Check the scorer identifier arguments; scores must be integers in 0..=100"
            }
            PipelineError::MalformedRecord { .. } => "The record was skipped; no action required",
            PipelineError::InvalidScoreKind { .. } | PipelineError::ScoringUnavailable { .. } => {
                "The article received the default score; check the scorer service if this repeats"
            }
            PipelineError::ProcessingError { .. } => "Re-run with --verbose to inspect the failing stage",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration check failed: {}", self),
            ErrorCategory::Network => format!("Could not reach the news service: {}", self),
            ErrorCategory::Data => format!("Could not process article data: {}", self),
            ErrorCategory::Scoring => format!("Scoring problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_critical() {
        let err = PipelineError::ScorerNotFound {
            identifier: "nope".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Configuration check failed"));
    }

    #[test]
    fn test_per_article_errors_are_low_severity() {
        let err = PipelineError::InvalidScoreKind {
            kind: "string".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Scoring);
        assert_eq!(err.severity(), ErrorSeverity::Low);

        let err = PipelineError::MalformedRecord {
            reason: "expected a JSON object, got array".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(
            err.to_string(),
            "Malformed record: expected a JSON object, got array"
        );
    }
}
