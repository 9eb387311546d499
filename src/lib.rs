pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{DeepSeekScorer, GNewsClient, LocalStorage};
pub use core::scoring::{FixedScorer, ScorerContext, ScorerRegistry};
pub use core::{etl::EtlEngine, pipeline::NewsPipeline};
pub use domain::model::{Article, OutputArticle, RunReport, Thresholds, TrafficLight};
pub use utils::error::{PipelineError, Result};
