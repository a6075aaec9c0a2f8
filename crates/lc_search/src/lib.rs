use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use lc_core::{Citation, Error, Result, SearchEnrichment, StyleConfig};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SEARCH_MODEL: &str = "gpt-4o";
const DEFAULT_COUNTRY: &str = "JP";

#[derive(Serialize)]
struct SearchRequest<'a> {
    model: &'a str,
    tools: Vec<SearchTool<'a>>,
    input: String,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct SearchTool<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    user_location: UserLocation<'a>,
    search_context_size: &'a str,
}

#[derive(Serialize)]
struct UserLocation<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    country: &'a str,
}

// Response shapes are deliberately loose: every field defaults, so a changed
// backend format under-extracts instead of failing the request.
#[derive(Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

#[derive(Deserialize)]
struct Annotation {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: Option<String>,
}

fn parse_enrichment(response: SearchResponse) -> SearchEnrichment {
    let mut summary = String::new();
    let mut citations = Vec::new();
    for item in response.output {
        if item.kind != "message" {
            continue;
        }
        for block in item.content {
            if block.kind != "output_text" {
                continue;
            }
            if summary.is_empty() {
                summary = block.text;
            }
            for annotation in block.annotations {
                if annotation.kind == "url_citation" && !annotation.url.is_empty() {
                    citations.push(Citation {
                        url: annotation.url,
                        title: annotation.title,
                    });
                }
            }
        }
    }
    SearchEnrichment { summary, citations }
}

/// Best-effort topic enrichment. Failures degrade to an empty enrichment and
/// are never surfaced to the pipeline.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn enrich(&self, config: &StyleConfig, topic: &str) -> SearchEnrichment;
}

/// Client for the web-search-augmented generation backend (OpenAI Responses
/// API with the `web_search_preview` tool).
pub struct WebSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for WebSearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSearchClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WebSearchClient {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Runs one web search and extracts summary plus citations.
    pub async fn search(&self, query: &str, country: &str) -> Result<SearchEnrichment> {
        let request = SearchRequest {
            model: SEARCH_MODEL,
            tools: vec![SearchTool {
                kind: "web_search_preview",
                user_location: UserLocation {
                    kind: "approximate",
                    country,
                },
                search_context_size: "medium",
            }],
            input: format!(
                "以下のトピックに関する最新情報を詳しく調査してください。情報は日本語で要約し、情報源も含めてください。検索対象: {}",
                query
            ),
            temperature: 0.7,
            top_p: 0.95,
        };

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Search(format!("search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Search(format!(
                "search backend returned status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("malformed search response: {}", e)))?;

        Ok(parse_enrichment(body))
    }
}

#[async_trait]
impl SearchBackend for WebSearchClient {
    async fn enrich(&self, config: &StyleConfig, topic: &str) -> SearchEnrichment {
        let query = format!("{} {}", config.company_name, topic);
        match self.search(&query, DEFAULT_COUNTRY).await {
            Ok(enrichment) => {
                tracing::info!(
                    query,
                    citations = enrichment.citations.len(),
                    summary_chars = enrichment.summary.chars().count(),
                    "web search enrichment complete"
                );
                enrichment
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "web search failed, continuing without enrichment");
                SearchEnrichment::empty()
            }
        }
    }
}
