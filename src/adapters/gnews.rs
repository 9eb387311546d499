//! GNews search API client.

use crate::domain::model::RawRecord;
use crate::domain::ports::{ArticleSource, ConfigProvider};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

pub const DEFAULT_ENDPOINT: &str = "https://gnews.io/api/v4/search";

#[derive(Clone)]
pub struct GNewsClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    query: String,
    lang: String,
    country: Option<String>,
    max_results: usize,
}

impl fmt::Debug for GNewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GNewsClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("query", &self.query)
            .field("lang", &self.lang)
            .field("country", &self.country)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl GNewsClient {
    pub fn from_config<C: ConfigProvider>(client: reqwest::Client, config: &C) -> Self {
        Self {
            client,
            endpoint: config.gnews_endpoint().to_string(),
            api_key: config.gnews_api_key().to_string(),
            query: config.query().to_string(),
            lang: config.lang().to_string(),
            country: config.country().map(str::to_string),
            max_results: config.max_results(),
        }
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.query.clone()),
            ("lang", self.lang.clone()),
            ("max", self.max_results.to_string()),
            ("apikey", self.api_key.clone()),
        ];
        if let Some(country) = &self.country {
            params.push(("country", country.clone()));
        }
        params
    }
}

#[async_trait]
impl ArticleSource for GNewsClient {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        tracing::debug!(
            endpoint = %self.endpoint,
            query = %self.query,
            lang = %self.lang,
            country = ?self.country,
            max = self.max_results,
            "Requesting articles"
        );

        // The request URL carries the API key, so errors are stripped of it.
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;

        let mut body: Value = response.json().await.map_err(reqwest::Error::without_url)?;
        let records: Vec<RawRecord> = match body.get_mut("articles").map(Value::take) {
            Some(Value::Array(items)) => items.into_iter().map(RawRecord::new).collect(),
            Some(other) => {
                tracing::warn!("'articles' is not an array ({}), treating as empty", other);
                Vec::new()
            }
            None => {
                tracing::warn!("Search response has no 'articles' field");
                Vec::new()
            }
        };

        tracing::info!(count = records.len(), "Fetched raw articles");
        Ok(records)
    }
}
