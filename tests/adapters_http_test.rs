use headline_light::adapters::deepseek::DEFAULT_MODEL;
use headline_light::core::scoring::{score_article, DEFAULT_SCORE};
use headline_light::core::{ArticleSource, Scorer};
use headline_light::{DeepSeekScorer, GNewsClient, PipelineError, TomlConfig};
use httpmock::prelude::*;
use serde_json::json;

fn search_config(endpoint: String, extra: &str) -> TomlConfig {
    let mut config = TomlConfig::from_toml_str(&format!(
        "[gnews]\napi_key = \"search-key\"\nquery = \"elections\"\nlang = \"fr\"\nmax_results = 10\n{}",
        extra
    ))
    .unwrap();
    config.gnews.endpoint = endpoint;
    config
}

fn scorer_for(server: &MockServer) -> DeepSeekScorer {
    DeepSeekScorer::new(
        reqwest::Client::new(),
        server.base_url(),
        "sk-test".to_string(),
        DEFAULT_MODEL.to_string(),
    )
    .unwrap()
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

#[tokio::test]
async fn test_search_sends_query_parameters() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/search")
            .query_param("q", "elections")
            .query_param("lang", "fr")
            .query_param("max", "10")
            .query_param("apikey", "search-key")
            .query_param("country", "fr");
        then.status(200).json_body(json!({
            "totalArticles": 3,
            "articles": [{"title": "a"}, {"title": "b"}, "not an object"]
        }));
    });

    let config = search_config(server.url("/api/v4/search"), "country = \"fr\"\n");
    let client = GNewsClient::from_config(reqwest::Client::new(), &config);

    let records = client.fetch().await.unwrap();

    mock.assert();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].data["title"], "a");
}

#[tokio::test]
async fn test_search_without_articles_array_yields_nothing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(json!({"totalArticles": 0}));
    });

    let config = search_config(server.url("/search"), "");
    let client = GNewsClient::from_config(reqwest::Client::new(), &config);

    assert!(client.fetch().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_error_status_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(403).body("{\"errors\":[\"invalid api key\"]}");
    });

    let config = search_config(server.url("/search"), "");
    let client = GNewsClient::from_config(reqwest::Client::new(), &config);

    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, PipelineError::ApiError(_)));
    assert!(!err.to_string().contains("search-key"));
    assert!(!err.user_friendly_message().contains("search-key"));
}

#[tokio::test]
async fn test_unreachable_search_api_error_hides_key() {
    // Bind then drop a listener so the port is closed.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = search_config(format!("http://127.0.0.1:{}/search", port), "");
    let client = GNewsClient::from_config(reqwest::Client::new(), &config);

    let err = client.fetch().await.unwrap_err();

    assert!(matches!(err, PipelineError::ApiError(_)));
    assert!(!err.to_string().contains("search-key"));
    assert!(!err.user_friendly_message().contains("search-key"));
    assert!(!format!("{:?}", err).contains("search-key"));
}

#[tokio::test]
async fn test_deepseek_reads_fenced_reply() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .header("authorization", "Bearer sk-test")
            .body_contains("\"deepseek-chat\"")
            .body_contains("Storm hits coast");
        then.status(200).json_body(chat_reply(
            "```json\n{\"misleadingScore\": 72, \"reason\": \"Overstates damage\"}\n```",
        ));
    });

    let scorer = scorer_for(&server);
    let raw = scorer.score("Storm hits coast", "Light rain reported.").await.unwrap();

    mock.assert();
    assert_eq!(raw, json!(72));
}

#[tokio::test]
async fn test_deepseek_score_is_validated_by_caller() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .json_body(chat_reply("{\"misleadingScore\": 140.7, \"reason\": \"x\"}"));
    });

    let scorer = scorer_for(&server);
    let outcome = score_article(&scorer, "t", "c", 4000).await;

    assert_eq!(outcome.score, 100);
    assert!(outcome.degraded.is_none());
}

#[tokio::test]
async fn test_deepseek_server_error_degrades() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(500);
    });

    let scorer = scorer_for(&server);
    let err = scorer.score("t", "c").await.unwrap_err();
    assert!(matches!(err, PipelineError::ScoringUnavailable { .. }));

    let outcome = score_article(&scorer, "t", "c", 4000).await;
    assert_eq!(outcome.score, DEFAULT_SCORE);
    assert!(matches!(
        outcome.degraded,
        Some(PipelineError::ScoringUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_deepseek_string_score_degrades() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .json_body(chat_reply("{\"misleadingScore\": \"high\"}"));
    });

    let scorer = scorer_for(&server);
    let outcome = score_article(&scorer, "t", "c", 4000).await;

    assert_eq!(outcome.score, DEFAULT_SCORE);
    assert!(matches!(
        outcome.degraded,
        Some(PipelineError::InvalidScoreKind { .. })
    ));
}

#[tokio::test]
async fn test_deepseek_prose_reply_degrades() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .json_body(chat_reply("I would rate this headline as fairly misleading."));
    });

    let scorer = scorer_for(&server);
    let outcome = score_article(&scorer, "t", "c", 4000).await;

    assert_eq!(outcome.score, DEFAULT_SCORE);
    assert!(matches!(
        outcome.degraded,
        Some(PipelineError::ScoringUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_long_content_is_truncated_before_scoring() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_contains("... [truncated]");
        then.status(200)
            .json_body(chat_reply("{\"misleadingScore\": 10}"));
    });

    let scorer = scorer_for(&server);
    let body = "word ".repeat(2000);
    let outcome = score_article(&scorer, "t", &body, 100).await;

    mock.assert();
    assert_eq!(outcome.score, 10);
}
