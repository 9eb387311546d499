use headline_light::core::{ArticleSource, ConfigProvider, RawRecord, Scorer};
use headline_light::{EtlEngine, LocalStorage, NewsPipeline, PipelineError, TomlConfig, TrafficLight};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tempfile::TempDir;

struct StaticSource(Vec<Value>);

#[async_trait::async_trait]
impl ArticleSource for StaticSource {
    async fn fetch(&self) -> headline_light::Result<Vec<RawRecord>> {
        Ok(self.0.iter().cloned().map(RawRecord::new).collect())
    }
}

struct TitleScorer(HashMap<String, i64>);

#[async_trait::async_trait]
impl Scorer for TitleScorer {
    fn name(&self) -> &str {
        "title"
    }

    async fn score(&self, title: &str, _content: &str) -> headline_light::Result<Value> {
        self.0
            .get(title)
            .map(|score| json!(score))
            .ok_or_else(|| PipelineError::ScoringUnavailable {
                message: format!("no score for {}", title),
            })
    }
}

fn config_for(output_path: &str, extra: &str) -> TomlConfig {
    let toml_content = format!(
        r#"
[gnews]
api_key = "test-key"

[sampling]
per_bin = 2
seed = 1234

[output]
path = "{}"
formats = ["json", "js"]

{}
"#,
        output_path.replace('\\', "/"),
        extra
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

fn ten_record_batch() -> (Vec<Value>, HashMap<String, i64>) {
    let scores = [0, 0, 0, 40, 40, 40, 80, 80, 80, 80];
    let records = (0..scores.len())
        .map(|i| {
            json!({
                "title": format!("Headline {}", i),
                "description": format!("Summary {}", i),
                "content": format!("First paragraph {}.\n\nSecond paragraph {}.", i, i),
                "url": format!("https://news.example/{}", i),
                "publishedAt": "2024-05-01T10:00:00Z",
                "source": {"id": "wire", "name": "Wire", "url": "https://wire.example", "country": "us"}
            })
        })
        .collect();
    let by_title = scores
        .iter()
        .enumerate()
        .map(|(i, score)| (format!("Headline {}", i), *score))
        .collect();
    (records, by_title)
}

#[tokio::test]
async fn test_ten_record_end_to_end_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let config = config_for(&output_path, "");

    let (records, scores) = ten_record_batch();
    let pipeline = NewsPipeline::new(
        StaticSource(records),
        Arc::new(TitleScorer(scores)),
        LocalStorage::new(output_path.clone()),
        config,
    );
    let engine = EtlEngine::new(pipeline);

    let report = engine.run().await.unwrap();

    assert_eq!(report.fetched, 10);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.degraded, 0);
    assert_eq!((report.bins.green, report.bins.yellow, report.bins.red), (3, 3, 4));
    assert_eq!(report.sampled_ids.len(), 6);

    let unique: HashSet<u32> = report.sampled_ids.iter().copied().collect();
    assert_eq!(unique.len(), 6);
    assert!(report.sampled_ids.iter().all(|id| (1..=10).contains(id)));

    let written = std::fs::read_to_string(temp_dir.path().join("articles.json")).unwrap();
    let articles: Vec<Value> = serde_json::from_str(&written).unwrap();
    assert_eq!(articles.len(), 6);

    let lights: Vec<TrafficLight> = articles
        .iter()
        .map(|a| a["trafficLightStatus"].as_str().unwrap().parse().unwrap())
        .collect();
    assert_eq!(
        lights,
        vec![
            TrafficLight::Green,
            TrafficLight::Green,
            TrafficLight::Yellow,
            TrafficLight::Yellow,
            TrafficLight::Red,
            TrafficLight::Red
        ]
    );
    for article in &articles {
        let id = article["id"].as_u64().unwrap() as u32;
        assert!(report.sampled_ids.contains(&id));
        assert_eq!(article["category"], "Wire • US");
        assert!(article["content"].as_str().unwrap().starts_with("<p>"));
    }

    let js = std::fs::read_to_string(temp_dir.path().join("articles.js")).unwrap();
    assert!(js.starts_with("const articles = "));
    assert!(js.trim_end().ends_with(';'));

    let report_file = std::fs::read_to_string(temp_dir.path().join("run_report.json")).unwrap();
    let stored: Value = serde_json::from_str(&report_file).unwrap();
    assert_eq!(stored["bins"]["red"], 4);
    assert_eq!(stored["sampledIds"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_same_seed_reproduces_sample() {
    let mut runs = Vec::new();
    for _ in 0..2 {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().to_str().unwrap().to_string();
        let (records, scores) = ten_record_batch();
        let pipeline = NewsPipeline::new(
            StaticSource(records),
            Arc::new(TitleScorer(scores)),
            LocalStorage::new(output_path.clone()),
            config_for(&output_path, ""),
        );
        runs.push(EtlEngine::new(pipeline).run().await.unwrap().sampled_ids);
    }

    assert_eq!(runs[0], runs[1]);
}

#[tokio::test]
async fn test_malformed_and_unscored_records_do_not_abort_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let records = vec![
        json!({"title": "Known"}),
        json!(42),
        json!({"title": "Unknown"}),
        json!({}),
    ];
    let scores = HashMap::from([("Known".to_string(), 10)]);
    let pipeline = NewsPipeline::new(
        StaticSource(records),
        Arc::new(TitleScorer(scores)),
        LocalStorage::new(output_path.clone()),
        config_for(&output_path, ""),
    );

    let report = EtlEngine::new(pipeline).run().await.unwrap();

    assert_eq!(report.fetched, 4);
    assert_eq!(report.skipped, 1);
    // "Unknown" and the untitled record fall back to 50.
    assert_eq!(report.degraded, 2);
    assert_eq!(report.bins.green, 1);
    assert_eq!(report.bins.yellow, 2);
}

#[tokio::test]
async fn test_full_run_against_mocked_search_api() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("q", "news")
            .query_param("apikey", "test-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "totalArticles": 2,
                "articles": [
                    {"title": "One", "content": "alpha beta gamma delta"},
                    {"title": "Two", "image": "https://img.example/2.png"}
                ]
            }));
    });

    let mut config = config_for(&output_path, "[scorer]\nidentifier = \"fixed:80\"\n");
    config.gnews.endpoint = server.url("/search");

    let client = reqwest::Client::new();
    let context = headline_light::ScorerContext {
        client: client.clone(),
        api_key: String::new(),
        endpoint: "http://unused.invalid".to_string(),
    };
    let scorer = headline_light::ScorerRegistry::with_builtin()
        .resolve(config.scorer_identifier(), &context)
        .unwrap();

    let source = headline_light::GNewsClient::from_config(client, &config);
    let pipeline = NewsPipeline::new(source, scorer, LocalStorage::new(output_path.clone()), config);
    let report = EtlEngine::new_with_monitoring(pipeline, true).run().await.unwrap();

    search_mock.assert();
    assert_eq!(report.fetched, 2);
    assert_eq!(report.bins.red, 2);
    assert_eq!(report.sampled_ids.len(), 2);

    let written = std::fs::read_to_string(temp_dir.path().join("articles.json")).unwrap();
    let articles: Vec<Value> = serde_json::from_str(&written).unwrap();
    assert!(articles.iter().all(|a| a["misleadingScore"] == 80));
}

#[tokio::test]
async fn test_search_api_failure_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(500);
    });

    let mut config = config_for(&output_path, "");
    config.gnews.endpoint = server.url("/search");

    let client = reqwest::Client::new();
    let source = headline_light::GNewsClient::from_config(client, &config);
    let scorer = Arc::new(headline_light::FixedScorer::new(10).unwrap());
    let pipeline = NewsPipeline::new(source, scorer, LocalStorage::new(output_path.clone()), config);

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, PipelineError::ApiError(_)));
    assert!(!temp_dir.path().join("run_report.json").exists());
}
