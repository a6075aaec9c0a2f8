use std::sync::Arc;

use lc_core::{GenerationResult, Result, SearchEnrichment, StyleConfig};
use lc_scraper::ArticleFetcher;
use lc_search::SearchBackend;

use crate::generator::ContentGenerator;

/// Sequences one generation run: scrape, optionally enrich, generate.
/// A run is atomic: it produces a full [`GenerationResult`] or fails.
/// Enrichment is the sole exception and degrades to empty silently.
pub struct Pipeline {
    fetcher: Arc<dyn ArticleFetcher>,
    search: Arc<dyn SearchBackend>,
    generator: ContentGenerator,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn ArticleFetcher>,
        search: Arc<dyn SearchBackend>,
        generator: ContentGenerator,
    ) -> Self {
        Self {
            fetcher,
            search,
            generator,
        }
    }

    pub async fn run(
        &self,
        config: &StyleConfig,
        selected_images: &[String],
        use_web_search: bool,
    ) -> Result<GenerationResult> {
        let article = self.fetcher.fetch_article(&config.blog_url).await?;
        tracing::info!(
            blog_url = %config.blog_url,
            content_chars = article.content.chars().count(),
            images = article.images.len(),
            "scrape complete"
        );

        let enrichment = if use_web_search {
            // The article title is the search topic.
            self.search.enrich(config, &article.title).await
        } else {
            SearchEnrichment::empty()
        };

        let generated_options = self
            .generator
            .generate(config, &article, selected_images, &enrichment)
            .await?;
        tracing::info!(options = generated_options.len(), "generation complete");

        Ok(GenerationResult {
            scraped_content: article,
            generated_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lc_core::{Error, ExtractedArticle};
    use lc_search::WebSearchClient;

    use crate::backend::ChatBackend;
    use crate::generator::VARIANT_COUNT;

    struct StubFetcher;

    #[async_trait]
    impl ArticleFetcher for StubFetcher {
        async fn fetch_article(&self, _url: &str) -> lc_core::Result<ExtractedArticle> {
            Ok(ExtractedArticle {
                title: "夏のセール開催".to_string(),
                content: "今週末は大セールです。".to_string(),
                images: vec!["https://example.com/img/a.jpg".to_string()],
            })
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ArticleFetcher for FailingFetcher {
        async fn fetch_article(&self, url: &str) -> lc_core::Result<ExtractedArticle> {
            Err(Error::Fetch(format!("failed to fetch {}", url)))
        }
    }

    struct StubSearch {
        enrichment: SearchEnrichment,
    }

    #[async_trait]
    impl SearchBackend for StubSearch {
        async fn enrich(&self, _config: &StyleConfig, _topic: &str) -> SearchEnrichment {
            self.enrichment.clone()
        }
    }

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn complete(
            &self,
            system: &str,
            _user: &str,
            _temperature: f32,
            _max_tokens: u32,
        ) -> lc_core::Result<String> {
            // Echoes a marker when the enrichment section reached the prompt.
            if system.contains("# Web検索で収集した追加情報") {
                Ok("enriched".to_string())
            } else {
                Ok("plain".to_string())
            }
        }
    }

    fn config() -> StyleConfig {
        serde_json::from_str(
            r#"{
                "company_name": "テスト株式会社",
                "company_url": "https://example.com",
                "blog_url": "https://example.com/blog/1"
            }"#,
        )
        .unwrap()
    }

    fn pipeline_with_search(search: Arc<dyn SearchBackend>) -> Pipeline {
        Pipeline::new(
            Arc::new(StubFetcher),
            search,
            ContentGenerator::new(Arc::new(EchoBackend)),
        )
    }

    #[tokio::test]
    async fn test_run_returns_article_and_three_variants() {
        let pipeline = pipeline_with_search(Arc::new(StubSearch {
            enrichment: SearchEnrichment::empty(),
        }));
        let result = pipeline.run(&config(), &[], false).await.unwrap();
        assert_eq!(result.scraped_content.title, "夏のセール開催");
        assert_eq!(result.generated_options.len(), VARIANT_COUNT);
    }

    #[tokio::test]
    async fn test_run_feeds_enrichment_into_prompt() {
        let pipeline = pipeline_with_search(Arc::new(StubSearch {
            enrichment: SearchEnrichment {
                summary: "競合情報あり".to_string(),
                citations: vec![],
            },
        }));
        let result = pipeline.run(&config(), &[], true).await.unwrap();
        assert!(result
            .generated_options
            .iter()
            .all(|v| v.content == "enriched"));
    }

    #[tokio::test]
    async fn test_run_skips_search_when_disabled() {
        let pipeline = pipeline_with_search(Arc::new(StubSearch {
            enrichment: SearchEnrichment {
                summary: "使われないはずの情報".to_string(),
                citations: vec![],
            },
        }));
        let result = pipeline.run(&config(), &[], false).await.unwrap();
        assert!(result.generated_options.iter().all(|v| v.content == "plain"));
    }

    #[tokio::test]
    async fn test_run_survives_search_backend_failure() {
        // A real search client pointed at a dead endpoint: the enrichment
        // degrades to empty and the run still succeeds.
        let search = WebSearchClient::new("test-key".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let pipeline = pipeline_with_search(Arc::new(search));
        let result = pipeline.run(&config(), &[], true).await.unwrap();
        assert_eq!(result.generated_options.len(), VARIANT_COUNT);
        assert!(result.generated_options.iter().all(|v| v.content == "plain"));
    }

    #[tokio::test]
    async fn test_run_propagates_fetch_failure() {
        let pipeline = Pipeline::new(
            Arc::new(FailingFetcher),
            Arc::new(StubSearch {
                enrichment: SearchEnrichment::empty(),
            }),
            ContentGenerator::new(Arc::new(EchoBackend)),
        );
        let err = pipeline.run(&config(), &[], false).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }
}
