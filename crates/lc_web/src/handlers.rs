use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use lc_core::{types::validate_absolute_url, Error, ExtractedArticle, GenerationResult, StyleConfig};

use crate::AppState;

/// Core errors mapped onto HTTP responses. Validation problems are the
/// client's fault; everything else is a server-side failure.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            Error::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("無効な入力です: {}", msg),
            ),
            Error::Fetch(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("記事のスクレイピングに失敗しました: {}", msg),
            ),
            Error::Generation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("LINE配信コンテンツの生成に失敗しました: {}", msg),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("サーバーエラーが発生しました: {}", other),
            ),
        };
        tracing::error!(status = %status, error = %self.0, "request failed");
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "online",
        "message": "コンテンツ自動生成APIへようこそ"
    }))
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

pub async fn scrape_blog(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UrlRequest>,
) -> Result<Json<ExtractedArticle>, ApiError> {
    validate_absolute_url(&request.url, "url")?;
    tracing::info!(url = %request.url, "scrape request");
    let article = state.scraper.fetch_article(&request.url).await?;
    Ok(Json(article))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub config: StyleConfig,
    #[serde(default)]
    pub selected_images: Vec<String>,
    #[serde(default = "default_use_web_search")]
    pub use_web_search: bool,
}

fn default_use_web_search() -> bool {
    true
}

pub async fn generate_line_content(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerationResult>, ApiError> {
    request.config.validate()?;
    tracing::info!(
        blog_url = %request.config.blog_url,
        use_web_search = request.use_web_search,
        selected_images = request.selected_images.len(),
        "generation request"
    );
    let result = state
        .pipeline
        .run(
            &request.config,
            &request.selected_images,
            request.use_web_search,
        )
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request};
    use lc_core::{Result, SearchEnrichment};
    use lc_generate::{ChatBackend, ContentGenerator, Pipeline};
    use lc_scraper::ArticleFetcher;
    use lc_search::SearchBackend;
    use tower::ServiceExt;

    struct StubFetcher;

    #[async_trait]
    impl ArticleFetcher for StubFetcher {
        async fn fetch_article(&self, _url: &str) -> Result<ExtractedArticle> {
            Ok(ExtractedArticle {
                title: "夏のセール開催".to_string(),
                content: "今週末は大セールです。".to_string(),
                images: vec!["https://example.com/img/a.jpg".to_string()],
            })
        }
    }

    struct StubSearch;

    #[async_trait]
    impl SearchBackend for StubSearch {
        async fn enrich(&self, _config: &StyleConfig, _topic: &str) -> SearchEnrichment {
            SearchEnrichment::empty()
        }
    }

    struct StubBackend;

    #[async_trait]
    impl ChatBackend for StubBackend {
        async fn complete(
            &self,
            _system: &str,
            _user: &str,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String> {
            Ok("生成されたテキスト🎉".to_string())
        }
    }

    async fn test_app() -> axum::Router {
        let fetcher = Arc::new(StubFetcher);
        let pipeline = Pipeline::new(
            fetcher.clone(),
            Arc::new(StubSearch),
            ContentGenerator::new(Arc::new(StubBackend)),
        );
        create_app(AppState {
            scraper: fetcher,
            pipeline,
        })
        .await
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_reports_online() {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "online");
    }

    #[tokio::test]
    async fn test_scrape_blog_rejects_malformed_url() {
        let app = test_app().await;
        let response = app
            .oneshot(json_request(
                "/api/scrape-blog",
                serde_json::json!({ "url": "not-a-url" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["detail"].as_str().unwrap().contains("無効な入力"));
    }

    #[tokio::test]
    async fn test_scrape_blog_returns_article() {
        let app = test_app().await;
        let response = app
            .oneshot(json_request(
                "/api/scrape-blog",
                serde_json::json!({ "url": "https://example.com/post/1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], "夏のセール開催");
        assert_eq!(body["images"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_returns_three_options() {
        let app = test_app().await;
        let response = app
            .oneshot(json_request(
                "/api/generate-line-content",
                serde_json::json!({
                    "company_name": "テスト株式会社",
                    "company_url": "https://example.com",
                    "blog_url": "https://example.com/blog/1",
                    "selected_images": [],
                    "use_web_search": false
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["scraped_content"]["title"], "夏のセール開催");
        let options = body["generated_options"].as_array().unwrap();
        assert_eq!(options.len(), 3);
        for option in options {
            assert!(!option["content"].as_str().unwrap().is_empty());
            assert!(option["markdown"]
                .as_str()
                .unwrap()
                .contains("[詳細を見る](https://example.com/blog/1)"));
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_blog_url() {
        let app = test_app().await;
        let response = app
            .oneshot(json_request(
                "/api/generate-line-content",
                serde_json::json!({
                    "company_name": "テスト株式会社",
                    "company_url": "https://example.com",
                    "blog_url": "nope"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
