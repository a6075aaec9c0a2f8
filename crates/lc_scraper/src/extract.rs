use std::collections::HashSet;

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use lc_core::ExtractedArticle;

/// Sentinel returned when no title candidate matches.
pub const UNKNOWN_TITLE: &str = "タイトル不明";

/// Subtrees that never contain article text.
const STRIP_TAGS: [&str; 5] = ["script", "style", "nav", "header", "footer"];

lazy_static! {
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref TITLE_CLASSES: Selector =
        Selector::parse(".article-title, .entry-title, .post-title").unwrap();
    static ref TITLE_TAG: Selector = Selector::parse("title").unwrap();
    /// Candidate content containers, most specific first. Blog markup is
    /// wildly inconsistent, so the first matching selector wins and the
    /// whole document is the last resort.
    static ref CONTENT_CONTAINERS: Vec<Selector> = [
        "article",
        ".article-content",
        ".entry-content",
        ".post-content",
        "#content",
        ".content",
        "main",
        ".main",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect();
    static ref PARAGRAPHS: Selector = Selector::parse("p, h2, h3").unwrap();
    static ref BLOCKS: Selector = Selector::parse("div, span, section").unwrap();
    static ref IMAGES: Selector = Selector::parse("img").unwrap();
}

/// Parses a fetched page into title, body text and image URLs.
pub fn parse_article(html: &str, page_url: &Url) -> ExtractedArticle {
    let document = Html::parse_document(html);
    ExtractedArticle {
        title: extract_title(&document),
        content: extract_content(&document),
        images: extract_images(&document, page_url),
    }
}

/// Title cascade: first h1, then known article-title classes, then the
/// `<title>` tag, then the sentinel.
pub fn extract_title(document: &Html) -> String {
    for selector in [&*H1, &*TITLE_CLASSES, &*TITLE_TAG] {
        if let Some(el) = document.select(selector).next() {
            let text = element_text(&el);
            if !text.is_empty() {
                return text;
            }
        }
    }
    UNKNOWN_TITLE.to_string()
}

/// First matching content container, or the document root.
fn content_container(document: &Html) -> ElementRef<'_> {
    for selector in CONTENT_CONTAINERS.iter() {
        if let Some(el) = document.select(selector).next() {
            return el;
        }
    }
    document.root_element()
}

/// Body text: p/h2/h3 inside the content container joined by newlines,
/// falling back to generic blocks, then to the raw container text.
pub fn extract_content(document: &Html) -> String {
    let container = content_container(document);

    let paragraphs = collect_texts(&container, &PARAGRAPHS);
    if !paragraphs.is_empty() {
        return paragraphs.join("\n");
    }

    let blocks = collect_texts(&container, &BLOCKS);
    if !blocks.is_empty() {
        return blocks.join("\n");
    }

    text_without_stripped(&container)
}

/// Image URLs from the content container, resolved against the page URL and
/// deduplicated in first-seen order. An image-free container triggers a
/// rescan of the whole document.
pub fn extract_images(document: &Html, page_url: &Url) -> Vec<String> {
    let container = content_container(document);
    let images = collect_images(&container, page_url);
    if !images.is_empty() {
        return images;
    }
    collect_images(&document.root_element(), page_url)
}

fn collect_texts(container: &ElementRef<'_>, selector: &Selector) -> Vec<String> {
    container
        .select(selector)
        .filter(|el| !in_stripped_subtree(el))
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .collect()
}

fn collect_images(container: &ElementRef<'_>, page_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();
    for img in container.select(&IMAGES) {
        let src = img
            .value()
            .attr("src")
            .or_else(|| img.value().attr("data-src"));
        if let Some(src) = src {
            if src.trim().is_empty() {
                continue;
            }
            if let Ok(resolved) = page_url.join(src) {
                let resolved = resolved.to_string();
                if seen.insert(resolved.clone()) {
                    images.push(resolved);
                }
            }
        }
    }
    images
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn in_stripped_subtree(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| STRIP_TAGS.contains(&ancestor.value().name()))
}

/// Text of the subtree with script/style/nav/header/footer content skipped.
fn text_without_stripped(container: &ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in container.descendants() {
        if let Some(text) = node.value().as_text() {
            let stripped = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| STRIP_TAGS.contains(&ancestor.value().name()));
            if !stripped {
                out.push_str(text);
            }
        }
    }
    out.trim().to_string()
}
