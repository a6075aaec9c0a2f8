use std::sync::Arc;

use futures::future;

use lc_core::{Error, ExtractedArticle, GeneratedVariant, Result, SearchEnrichment, StyleConfig};

use crate::backend::ChatBackend;
use crate::prompt;

/// Number of candidate rewrites produced per request.
pub const VARIANT_COUNT: usize = 3;

/// Output cap per variant.
const MAX_OUTPUT_TOKENS: u32 = 800;

/// Temperature rises per variant so the candidates differ in style.
/// Identical outputs are still possible and are not deduplicated.
const BASE_TEMPERATURE: f32 = 0.7;
const TEMPERATURE_STEP: f32 = 0.1;

/// Drives the chat backend to produce the variant set for one request.
pub struct ContentGenerator {
    backend: Arc<dyn ChatBackend>,
}

impl ContentGenerator {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Produces exactly [`VARIANT_COUNT`] variants, all-or-nothing: one
    /// failed backend call fails the whole request.
    pub async fn generate(
        &self,
        config: &StyleConfig,
        article: &ExtractedArticle,
        selected_images: &[String],
        enrichment: &SearchEnrichment,
    ) -> Result<Vec<GeneratedVariant>> {
        let system_prompt = prompt::build_prompt(config, article, selected_images, enrichment);

        // The calls are independent given the same prompt, so they fan out
        // concurrently and join before the result is assembled.
        let backend = self.backend.as_ref();
        let calls = (0..VARIANT_COUNT).map(|index| {
            let system_prompt = system_prompt.as_str();
            async move {
                let user = format!(
                    "LINE配信記事のバリエーション{}を生成してください。",
                    index + 1
                );
                let temperature = BASE_TEMPERATURE + TEMPERATURE_STEP * index as f32;
                backend
                    .complete(system_prompt, &user, temperature, MAX_OUTPUT_TOKENS)
                    .await
            }
        });

        let contents = future::try_join_all(calls).await.map_err(|e| match e {
            e @ Error::Generation(_) => e,
            other => Error::Generation(other.to_string()),
        })?;

        Ok(contents
            .into_iter()
            .map(|content| {
                let markdown = format_markdown(&content, selected_images, Some(&config.blog_url));
                GeneratedVariant { content, markdown }
            })
            .collect())
    }
}

/// Appends numbered image references and the source link to the raw text.
pub fn format_markdown(content: &str, images: &[String], blog_url: Option<&str>) -> String {
    let mut markdown = content.to_string();
    for (index, image_url) in images.iter().enumerate() {
        markdown.push_str(&format!("\n\n![記事画像 {}]({})", index + 1, image_url));
    }
    if let Some(url) = blog_url {
        if !url.is_empty() {
            markdown.push_str(&format!("\n\n[詳細を見る]({})", url));
        }
    }
    markdown
}
