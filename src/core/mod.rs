pub mod classify;
pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod sampling;
pub mod scoring;

pub use crate::domain::model::{RawRecord, TransformResult};
pub use crate::domain::ports::{ArticleSource, ConfigProvider, Pipeline, Scorer, Storage};
pub use crate::utils::error::Result;
