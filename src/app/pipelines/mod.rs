pub mod news_pipeline;

pub use news_pipeline::NewsPipeline;
