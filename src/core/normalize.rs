use crate::domain::model::{Article, Source};
use crate::utils::error::{PipelineError, Result};
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const CONTENT_PLACEHOLDER: &str = "Content not available.";

/// Number of chunks a body without blank lines is cut into.
const FALLBACK_PARAGRAPHS: usize = 3;

static BLANK_LINE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\n[ \t\r]*\n").expect("blank line pattern"));
static PARAGRAPH_BREAK: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"</p>\s*<p>").expect("paragraph break pattern"));

/// Build an [`Article`] from one raw search-API record.
///
/// Every field is optional and falls back to a default; the only failure is a record
/// that is not a JSON object at all.
pub fn normalize(raw: &Value, sequence_id: u32) -> Result<Article> {
    let obj = raw.as_object().ok_or_else(|| PipelineError::MalformedRecord {
        reason: format!("expected a JSON object, got {}", value_kind(raw)),
    })?;

    let source = extract_source(obj.get("source"));
    let category = source.category_label();

    Ok(Article {
        id: sequence_id,
        title: text_field(obj, "title"),
        summary: text_field(obj, "description"),
        category,
        image: obj
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        traffic_light_status: None,
        misleading_score: 0,
        content: format_content(obj.get("content").and_then(Value::as_str).unwrap_or_default()),
        url: text_field(obj, "url"),
        published_at: text_field(obj, "publishedAt"),
        source: Some(source),
        related: Vec::new(),
    })
}

fn extract_source(raw: Option<&Value>) -> Source {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return Source::default();
    };

    let defaults = Source::default();
    Source {
        id: obj
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.id),
        name: obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.name),
        url: obj
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.url),
        country: obj
            .get("country")
            .and_then(Value::as_str)
            .map(|c| c.trim().to_uppercase())
            .unwrap_or(defaults.country),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Split a body into display paragraphs.
///
/// A body containing a blank line keeps its non-empty blocks as they are, even when only
/// one remains. A body without blank lines is cut into three
/// chunks of near-equal word count. An empty body yields the placeholder paragraph.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    if body.trim().is_empty() {
        return vec![CONTENT_PLACEHOLDER.to_string()];
    }

    let paragraphs: Vec<String> = if BLANK_LINE.is_match(body) {
        BLANK_LINE
            .split(body)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        split_by_words(body, FALLBACK_PARAGRAPHS)
    };

    if paragraphs.is_empty() {
        vec![CONTENT_PLACEHOLDER.to_string()]
    } else {
        paragraphs
    }
}

/// Leading chunks take the remainder, so 10 words over 3 chunks gives 4/3/3.
fn split_by_words(text: &str, chunks: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let base = words.len() / chunks;
    let extra = words.len() % chunks;

    let mut paragraphs = Vec::with_capacity(chunks);
    let mut start = 0;
    for i in 0..chunks {
        let size = base + usize::from(i < extra);
        if size == 0 {
            continue;
        }
        paragraphs.push(words[start..start + size].join(" "));
        start += size;
    }
    paragraphs
}

pub fn render_paragraphs(paragraphs: &[String]) -> String {
    paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_content(body: &str) -> String {
    render_paragraphs(&split_paragraphs(body))
}

/// Undo [`render_paragraphs`]: paragraphs separated by blank lines, markup removed.
pub fn plain_text(content: &str) -> String {
    let joined = PARAGRAPH_BREAK.replace_all(content.trim(), "\n\n");
    joined
        .trim_start_matches("<p>")
        .trim_end_matches("</p>")
        .to_string()
}
