//! HTML parser for extracting article links
//!
//! Only links into the site's content namespace are kept:
//! - `<a href="...">` whose href starts with the article prefix (`/wiki/`)
//! - and whose href contains no namespace separator (`:`)
//!
//! Document order is preserved; links are returned as written, relative or
//! absolute, and are resolved later by the normalizer.

use scraper::{Html, Selector};

/// Default path prefix of content pages
pub const DEFAULT_LINK_PREFIX: &str = "/wiki/";

/// Namespace separator; `/wiki/File:x.png` is not an article
const NAMESPACE_SEPARATOR: char = ':';

/// Capability to pull followable links out of a page body
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, body: &str) -> Vec<String>;
}

/// Extracts same-site article links from HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLinkExtractor {
    prefix: String,
}

impl ArticleLinkExtractor {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn is_article_link(&self, href: &str) -> bool {
        href.starts_with(&self.prefix) && !href.contains(NAMESPACE_SEPARATOR)
    }
}

impl Default for ArticleLinkExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_PREFIX)
    }
}

impl LinkExtractor for ArticleLinkExtractor {
    /// # Example
    ///
    /// ```
    /// use wiki_ranker::crawler::{ArticleLinkExtractor, LinkExtractor};
    ///
    /// let html = r#"<a href="/wiki/Rust">Rust</a><a href="/wiki/File:Logo.png">logo</a>"#;
    /// let links = ArticleLinkExtractor::default().extract(html);
    /// assert_eq!(links, vec!["/wiki/Rust".to_string()]);
    /// ```
    fn extract(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);

        let Ok(a_selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        document
            .select(&a_selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| self.is_article_link(href))
            .map(str::to_string)
            .collect()
    }
}
