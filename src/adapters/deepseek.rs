//! Reference LLM scorer backed by DeepSeek's OpenAI-compatible chat completions API.

use crate::domain::ports::Scorer;
use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::validate_required_secret;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

const SYSTEM_PROMPT: &str =
    "You are a news analysis assistant. Always respond with valid JSON only.";

static FENCED_JSON: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fenced json pattern")
});

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

pub struct DeepSeekScorer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for DeepSeekScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSeekScorer")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl DeepSeekScorer {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self> {
        validate_required_secret("scorer.api_key", &api_key)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

pub fn build_prompt(title: &str, content: &str) -> String {
    format!(
        "Rate how misleading the headline below is with respect to the article body, \
on a scale from 0 to 100.\n\n\
0-33: the headline faithfully reflects the body.\n\
34-66: the headline exaggerates, drops important context or leans on sensational wording.\n\
67-100: the headline misrepresents or contradicts the body, or is clickbait.\n\n\
HEADLINE:\n{title}\n\n\
BODY:\n{content}\n\n\
Reply with a single JSON object and nothing else:\n\
{{\"misleadingScore\": <integer>, \"reason\": \"<one short sentence>\"}}"
    )
}

/// Strip markdown code fences an LLM may wrap around its JSON.
pub fn extract_json_payload(text: &str) -> &str {
    if let Some(inner) = FENCED_JSON.captures(text).and_then(|caps| caps.get(1)) {
        return inner.as_str();
    }
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Pull the raw `misleadingScore` out of a model reply. The value is returned unvalidated.
pub fn parse_verdict(text: &str) -> Result<Value> {
    let payload = extract_json_payload(text);
    let parsed: Value =
        serde_json::from_str(payload).map_err(|e| PipelineError::ScoringUnavailable {
            message: format!(
                "unparseable scorer reply ({}): {}",
                e,
                truncate_for_log(text, 200)
            ),
        })?;

    if let Some(reason) = parsed.get("reason").and_then(Value::as_str) {
        tracing::debug!(reason = %truncate_for_log(reason, 120), "Scorer reasoning");
    }

    parsed
        .get("misleadingScore")
        .cloned()
        .ok_or_else(|| PipelineError::ScoringUnavailable {
            message: format!(
                "scorer reply has no misleadingScore: {}",
                truncate_for_log(payload, 200)
            ),
        })
}

fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
        None => s.to_string(),
    }
}

fn unavailable(e: reqwest::Error) -> PipelineError {
    let message = if e.is_timeout() {
        format!("scorer request timed out: {}", e)
    } else {
        format!("scorer request failed: {}", e)
    };
    PipelineError::ScoringUnavailable { message }
}

#[async_trait]
impl Scorer for DeepSeekScorer {
    fn name(&self) -> &str {
        "deepseek"
    }

    async fn score(&self, title: &str, content: &str) -> Result<Value> {
        let prompt = build_prompt(title, content);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.1,
            max_tokens: 200,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::ScoringUnavailable {
                message: format!("scorer API returned {}", status),
            });
        }

        let body: ChatResponse = response.json().await.map_err(unavailable)?;
        let reply = body
            .choices
            .first()
            .map(|choice| choice.message.content.trim())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| PipelineError::ScoringUnavailable {
                message: "scorer reply had no content".to_string(),
            })?;

        parse_verdict(reply)
    }
}
