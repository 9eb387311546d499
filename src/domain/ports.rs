use crate::domain::model::{RawRecord, RunReport, Thresholds, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn gnews_endpoint(&self) -> &str;
    fn gnews_api_key(&self) -> &str;
    fn query(&self) -> &str;
    fn lang(&self) -> &str;
    /// `None` searches every country.
    fn country(&self) -> Option<&str>;
    fn max_results(&self) -> usize;

    fn thresholds(&self) -> Thresholds;

    fn scorer_identifier(&self) -> &str;
    fn scorer_api_key(&self) -> &str;
    fn scorer_endpoint(&self) -> &str;
    fn max_content_chars(&self) -> usize;

    fn per_bin(&self) -> usize;
    fn seed(&self) -> Option<u64>;

    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];

    fn concurrent_requests(&self) -> usize;
    fn request_timeout_seconds(&self) -> u64;
}

/// Where raw records come from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawRecord>>;
}

/// The pluggable `score(title, content)` capability.
///
/// The returned value is untrusted: it is passed through
/// [`validate_score`](crate::core::scoring::validate_score) before it reaches an article.
#[async_trait]
pub trait Scorer: Send + Sync {
    fn name(&self) -> &str;
    async fn score(&self, title: &str, content: &str) -> Result<serde_json::Value>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    async fn transform(&self, data: Vec<RawRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<RunReport>;
}
