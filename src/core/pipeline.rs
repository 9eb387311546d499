pub use crate::app::pipelines::news_pipeline::{
    render_js_module, NewsPipeline, ARTICLES_JS, ARTICLES_JSON, RUN_REPORT,
};
