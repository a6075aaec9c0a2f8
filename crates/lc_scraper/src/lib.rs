pub mod blog;
pub mod extract;

pub use blog::{ArticleFetcher, BlogScraper};

pub mod prelude {
    pub use super::blog::{ArticleFetcher, BlogScraper};
    pub use lc_core::{Error, ExtractedArticle, Result};
}
