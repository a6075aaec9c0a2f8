use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::Result;

/// Style configuration for one generation request. Deserialized once from the
/// request body and never mutated afterwards; defaults mirror the form values
/// the frontend sends when a field is left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub company_name: String,
    pub company_url: String,
    pub blog_url: String,
    #[serde(default = "default_redirect_text")]
    pub redirect_text: String,
    #[serde(default = "default_bracket_type")]
    pub bracket_type: String,
    #[serde(default = "default_honorific")]
    pub honorific: String,
    #[serde(default = "default_child_honorific")]
    pub child_honorific: String,
    #[serde(default)]
    pub fixed_format: Option<String>,
    #[serde(default = "default_true")]
    pub add_emotional_intro: bool,
    #[serde(default)]
    pub writing_style: WritingStyle,
    #[serde(default)]
    pub line_break_style: LineBreakStyle,
    #[serde(default = "default_content_length")]
    pub content_length: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_bullet_point")]
    pub bullet_point: String,
    #[serde(default = "default_emoji_types")]
    pub emoji_types: String,
    #[serde(default = "default_emoji_count")]
    pub emoji_count: String,
    #[serde(default = "default_greeting_text")]
    pub greeting_text: String,
    #[serde(default)]
    pub reference_template: Option<String>,
}

impl StyleConfig {
    /// Rejects malformed URL fields before the pipeline runs.
    pub fn validate(&self) -> Result<()> {
        validate_absolute_url(&self.company_url, "company_url")?;
        validate_absolute_url(&self.blog_url, "blog_url")?;
        Ok(())
    }
}

/// Checks that `value` parses as an absolute http(s) URL.
pub fn validate_absolute_url(value: &str, field: &str) -> Result<()> {
    let parsed = Url::parse(value)
        .map_err(|_| Error::Validation(format!("{} is not a valid URL: {}", field, value)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::Validation(format!(
            "{} must be an http(s) URL, got scheme {:?}: {}",
            field, scheme, value
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingStyle {
    Formal,
    #[default]
    Casual,
}

impl WritingStyle {
    /// Literal embedded into the prompt.
    pub fn as_japanese(&self) -> &'static str {
        match self {
            WritingStyle::Formal => "丁寧",
            WritingStyle::Casual => "カジュアル",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreakStyle {
    #[default]
    Readability,
    Short,
    Long,
}

impl LineBreakStyle {
    pub fn as_japanese(&self) -> &'static str {
        match self {
            LineBreakStyle::Readability => "読みやすさ重視",
            LineBreakStyle::Short => "短め",
            LineBreakStyle::Long => "長め",
        }
    }
}

/// Structured result of scraping one blog page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
    /// Absolute image URLs, deduplicated, first-seen order.
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub title: Option<String>,
}

/// Web-search summary plus the citations it was built from. Search is a
/// best-effort enhancement: when it is disabled or fails the pipeline carries
/// an empty enrichment instead of an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchEnrichment {
    pub summary: String,
    pub citations: Vec<Citation>,
}

impl SearchEnrichment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
    }
}

/// One generated candidate: the raw model text and its display form with
/// image references and the source link appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedVariant {
    pub content: String,
    pub markdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub scraped_content: ExtractedArticle,
    pub generated_options: Vec<GeneratedVariant>,
}

fn default_true() -> bool {
    true
}

fn default_redirect_text() -> String {
    "詳しく知りたい方は、下のリンクor画像をタップ👇✨".to_string()
}

fn default_bracket_type() -> String {
    "【】".to_string()
}

fn default_honorific() -> String {
    "様".to_string()
}

fn default_child_honorific() -> String {
    "お子様".to_string()
}

fn default_content_length() -> String {
    "200文字前後".to_string()
}

fn default_date_format() -> String {
    "MM月DD日(ddd), HH:MM".to_string()
}

fn default_bullet_point() -> String {
    "🟧".to_string()
}

fn default_emoji_types() -> String {
    "🏡✨👇🎉😊💁‍♂️🎁🌱🌿".to_string()
}

fn default_emoji_count() -> String {
    "4~5".to_string()
}

fn default_greeting_text() -> String {
    "{name}さま　こんばんは！".to_string()
}
