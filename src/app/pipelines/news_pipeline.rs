use crate::core::normalize::{normalize, plain_text};
use crate::core::sampling::{bin_stats, sample_by_light};
use crate::core::scoring::{score_article, DEFAULT_SCORE};
use crate::core::{ArticleSource, ConfigProvider, Pipeline, RawRecord, Scorer, Storage, TransformResult};
use crate::domain::model::{Article, OutputArticle, RunReport, Thresholds};
use crate::utils::error::{PipelineError, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

pub const ARTICLES_JSON: &str = "articles.json";
pub const ARTICLES_JS: &str = "articles.js";
pub const RUN_REPORT: &str = "run_report.json";

/// fetch → normalize → score → classify → sample → persist.
pub struct NewsPipeline<A: ArticleSource, S: Storage, C: ConfigProvider> {
    pub(crate) source: A,
    pub(crate) scorer: Arc<dyn Scorer>,
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<A: ArticleSource, S: Storage, C: ConfigProvider> NewsPipeline<A, S, C> {
    /// The scorer must already be resolved; resolution errors belong to startup.
    pub fn new(source: A, scorer: Arc<dyn Scorer>, storage: S, config: C) -> Self {
        Self {
            source,
            scorer,
            storage,
            config,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

/// Normalize in fetch order; ids are dense and start at 1, malformed records are skipped.
fn normalize_batch(records: &[RawRecord]) -> (Vec<Article>, usize) {
    let mut articles = Vec::with_capacity(records.len());
    let mut skipped = 0;
    let mut next_id: u32 = 1;

    for (position, record) in records.iter().enumerate() {
        match normalize(&record.data, next_id) {
            Ok(article) => {
                articles.push(article);
                next_id += 1;
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(position, error = %e, "Skipping record");
            }
        }
    }

    (articles, skipped)
}

/// Score and classify one article as a unit. Returns whether the default score was used.
async fn score_and_classify(
    scorer: &dyn Scorer,
    mut article: Article,
    thresholds: Thresholds,
    max_content_chars: usize,
) -> (Article, bool) {
    let body = plain_text(&article.content);
    let outcome = score_article(scorer, &article.title, &body, max_content_chars).await;

    if let Some(e) = &outcome.degraded {
        tracing::warn!(
            article_id = article.id,
            error = %e,
            default_score = DEFAULT_SCORE,
            "Scoring failed, using default score"
        );
    }

    article.misleading_score = outcome.score;
    article.traffic_light_status = Some(thresholds.classify(outcome.score));
    tracing::debug!(
        article_id = article.id,
        score = article.misleading_score,
        light = ?article.traffic_light_status,
        "Classified article"
    );

    (article, outcome.degraded.is_some())
}

pub fn render_js_module(articles: &[OutputArticle]) -> Result<String> {
    Ok(format!(
        "const articles = {};\n",
        serde_json::to_string_pretty(articles)?
    ))
}

#[async_trait::async_trait]
impl<A: ArticleSource, S: Storage, C: ConfigProvider> Pipeline for NewsPipeline<A, S, C> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        self.source.fetch().await
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<TransformResult> {
        let (articles, skipped) = normalize_batch(&data);

        let thresholds = self.config.thresholds();
        let max_content_chars = self.config.max_content_chars();
        let scorer = self.scorer.as_ref();

        // `buffered` yields in input order, so results stay aligned with ids.
        let scored: Vec<(Article, bool)> = stream::iter(articles)
            .map(|article| score_and_classify(scorer, article, thresholds, max_content_chars))
            .buffered(self.config.concurrent_requests().max(1))
            .collect()
            .await;

        let degraded = scored.iter().filter(|(_, degraded)| *degraded).count();
        let articles: Vec<Article> = scored.into_iter().map(|(article, _)| article).collect();

        let stats = bin_stats(&articles);
        let sampled = sample_by_light(&articles, self.config.per_bin(), self.config.seed());

        tracing::info!(
            scored = articles.len(),
            skipped,
            degraded,
            green = stats.green,
            yellow = stats.yellow,
            red = stats.red,
            sampled = sampled.len(),
            "Scored and sampled articles"
        );

        Ok(TransformResult {
            articles,
            sampled,
            stats,
            skipped,
            degraded,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<RunReport> {
        let output: Vec<OutputArticle> = result.sampled.iter().map(Article::to_output).collect();
        let base = self.config.output_path().trim_end_matches('/');

        let mut output_files = Vec::new();
        for format in self.config.output_formats() {
            let (file_name, bytes) = match format.as_str() {
                "json" => (ARTICLES_JSON, serde_json::to_vec_pretty(&output)?),
                "js" => (ARTICLES_JS, render_js_module(&output)?.into_bytes()),
                other => {
                    return Err(PipelineError::ProcessingError {
                        message: format!("unsupported output format '{}'", other),
                    })
                }
            };

            tracing::debug!("Writing {} ({} bytes)", file_name, bytes.len());
            self.storage.write_file(file_name, &bytes).await?;
            output_files.push(format!("{}/{}", base, file_name));
        }

        let report = RunReport {
            generated_at: Utc::now(),
            fetched: result.articles.len() + result.skipped,
            skipped: result.skipped,
            degraded: result.degraded,
            bins: result.stats,
            sampled_ids: result.sampled.iter().map(|a| a.id).collect(),
            output_files,
        };

        self.storage
            .write_file(RUN_REPORT, &serde_json::to_vec_pretty(&report)?)
            .await?;

        Ok(report)
    }
}
