use crate::adapters::deepseek::{DeepSeekScorer, DEFAULT_MODEL};
use crate::core::normalize::value_kind;
use crate::domain::ports::Scorer;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Score given to an article whose scoring call failed: the midpoint, "unknown".
pub const DEFAULT_SCORE: u8 = 50;
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 4000;
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Turn an untrusted scorer output into a score in `0..=100`.
///
/// Floats are truncated toward zero; anything that is not a JSON number is rejected.
pub fn validate_score(raw: &Value) -> Result<u8> {
    let Value::Number(number) = raw else {
        return Err(PipelineError::InvalidScoreKind {
            kind: value_kind(raw).to_string(),
        });
    };

    let clamped = match number.as_i64() {
        Some(int) => int.clamp(0, 100),
        None => match number.as_f64() {
            Some(float) => float.trunc().clamp(0.0, 100.0) as i64,
            None => {
                return Err(PipelineError::InvalidScoreKind {
                    kind: "number".to_string(),
                })
            }
        },
    };
    Ok(clamped as u8)
}

/// Cap `content` at `max_chars` characters, appending [`TRUNCATION_MARKER`] when cut.
pub fn truncate_content(content: &str, max_chars: usize) -> Cow<'_, str> {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}{}", &content[..byte_idx], TRUNCATION_MARKER)),
        None => Cow::Borrowed(content),
    }
}

#[derive(Debug)]
pub struct ScoreOutcome {
    pub score: u8,
    /// Set when the default score was substituted.
    pub degraded: Option<PipelineError>,
}

/// Invoke a scorer and never fail: any error degrades to [`DEFAULT_SCORE`].
pub async fn score_article(
    scorer: &dyn Scorer,
    title: &str,
    content: &str,
    max_content_chars: usize,
) -> ScoreOutcome {
    let content = truncate_content(content, max_content_chars);
    let result = scorer
        .score(title, &content)
        .await
        .and_then(|raw| validate_score(&raw));

    match result {
        Ok(score) => ScoreOutcome {
            score,
            degraded: None,
        },
        Err(e) => ScoreOutcome {
            score: DEFAULT_SCORE,
            degraded: Some(e),
        },
    }
}

/// Shared resources handed to scorer factories at startup.
#[derive(Debug, Clone)]
pub struct ScorerContext {
    pub client: reqwest::Client,
    pub api_key: String,
    pub endpoint: String,
}

type ScorerFactory =
    Box<dyn Fn(Option<&str>, &ScorerContext) -> Result<Arc<dyn Scorer>> + Send + Sync>;

/// Scorers addressable by identifier, `name` or `name:argument`.
pub struct ScorerRegistry {
    factories: BTreeMap<String, ScorerFactory>,
}

impl ScorerRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// `deepseek[:model]` and `fixed:<score>`.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("deepseek", |argument, ctx| {
            let model = argument.unwrap_or(DEFAULT_MODEL);
            if model.trim().is_empty() {
                return Err(PipelineError::ScorerContractViolation {
                    identifier: "deepseek".to_string(),
                    reason: "model override must not be empty".to_string(),
                });
            }
            let scorer = DeepSeekScorer::new(
                ctx.client.clone(),
                ctx.endpoint.clone(),
                ctx.api_key.clone(),
                model.to_string(),
            )?;
            Ok(Arc::new(scorer) as Arc<dyn Scorer>)
        });
        registry.register("fixed", |argument, _ctx| {
            let score = FixedScorer::parse(argument)?;
            Ok(Arc::new(score) as Arc<dyn Scorer>)
        });
        registry
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(Option<&str>, &ScorerContext) -> Result<Arc<dyn Scorer>> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Resolve once, before any article is processed.
    pub fn resolve(&self, identifier: &str, ctx: &ScorerContext) -> Result<Arc<dyn Scorer>> {
        let identifier = identifier.trim();
        let (name, argument) = match identifier.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (identifier, None),
        };

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PipelineError::ScorerNotFound {
                identifier: identifier.to_string(),
            })?;

        let scorer = factory(argument, ctx)?;
        tracing::info!(identifier, scorer = scorer.name(), "Resolved scorer");
        Ok(scorer)
    }
}

impl Default for ScorerRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

pub fn resolve_scorer(identifier: &str, ctx: &ScorerContext) -> Result<Arc<dyn Scorer>> {
    ScorerRegistry::with_builtin().resolve(identifier, ctx)
}

/// Returns the same score for every article; handy for offline and dry runs.
#[derive(Debug, Clone)]
pub struct FixedScorer {
    score: u8,
}

impl FixedScorer {
    pub fn new(score: u8) -> Result<Self> {
        if score > 100 {
            return Err(PipelineError::ScorerContractViolation {
                identifier: format!("fixed:{}", score),
                reason: "score must be within 0..=100".to_string(),
            });
        }
        Ok(Self { score })
    }

    fn parse(argument: Option<&str>) -> Result<Self> {
        let violation = |reason: String| PipelineError::ScorerContractViolation {
            identifier: format!("fixed:{}", argument.unwrap_or_default()),
            reason,
        };

        let raw = argument
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| violation("expected an integer score, e.g. fixed:50".to_string()))?;
        let value: i64 = raw
            .parse()
            .map_err(|_| violation(format!("'{}' is not an integer", raw)))?;
        let score = u8::try_from(value)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or_else(|| violation(format!("{} is outside 0..=100", value)))?;
        Self::new(score)
    }
}

#[async_trait]
impl Scorer for FixedScorer {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn score(&self, _title: &str, _content: &str) -> Result<Value> {
        Ok(Value::from(self.score))
    }
}
