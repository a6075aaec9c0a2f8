use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use lc_core::{Error, ExtractedArticle, Result};

use crate::extract;

/// Browser-like user agent; several blog hosts reject the default reqwest one.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Page fetches must not hang the pipeline.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of extracted articles. Seam for tests and for the pipeline.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle>;
}

/// Fetches blog pages and extracts title, body and images.
#[derive(Debug, Clone)]
pub struct BlogScraper {
    client: Client,
}

impl BlogScraper {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub async fn scrape(&self, url: &str) -> Result<ExtractedArticle> {
        let page_url = Url::parse(url)
            .map_err(|e| Error::Fetch(format!("invalid article URL {}: {}", url, e)))?;

        let response = self
            .client
            .get(page_url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "request to {} returned status {}",
                url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read body of {}: {}", url, e)))?;

        let article = extract::parse_article(&html, &page_url);
        tracing::info!(
            url,
            title = %article.title,
            content_chars = article.content.chars().count(),
            images = article.images.len(),
            "scraped article"
        );
        Ok(article)
    }
}

#[async_trait]
impl ArticleFetcher for BlogScraper {
    async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle> {
        self.scrape(url).await
    }
}
