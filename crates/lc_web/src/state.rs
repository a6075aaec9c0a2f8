use std::sync::Arc;

use lc_generate::Pipeline;
use lc_scraper::ArticleFetcher;

pub struct AppState {
    pub scraper: Arc<dyn ArticleFetcher>,
    pub pipeline: Pipeline,
}
