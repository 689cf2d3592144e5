use crate::UrlError;
use url::Url;

/// Separator that replaces whitespace inside page titles
const TITLE_SEPARATOR: &str = "_";

/// Normalizes a single link according to Wiki-Ranker's canonical form
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Decode `%20` so encoded and literal spaces are treated alike
/// 3. Collapse every whitespace run to a single `_`
/// 4. Resolve against the site mask (absolute links are kept as-is)
/// 5. Remove the fragment (everything after #)
///
/// Two renderings of the same page title must normalize identically,
/// otherwise the visited set cannot deduplicate them.
///
/// # Examples
///
/// ```
/// use wiki_ranker::url::{normalize_url, site_mask};
///
/// let mask = site_mask("https://en.wikipedia.org/wiki/Matter").unwrap();
/// let url = normalize_url(" /wiki/Grand Unified%20Theory#History ", &mask).unwrap();
/// assert_eq!(url, "https://en.wikipedia.org/wiki/Grand_Unified_Theory");
/// ```
pub fn normalize_url(link: &str, mask: &Url) -> Result<String, UrlError> {
    let canonical = canonical_title(link);
    if canonical.is_empty() {
        return Err(UrlError::Malformed("empty link".to_string()));
    }

    let mut url = mask
        .join(&canonical)
        .map_err(|e| UrlError::Parse(format!("{}: {}", canonical, e)))?;

    url.set_fragment(None);

    Ok(url.into())
}

/// Normalizes a batch of links, preserving discovery order
///
/// Links that cannot be resolved are dropped.
pub fn normalize_links(links: &[String], mask: &Url) -> Vec<String> {
    links
        .iter()
        .filter_map(|link| match normalize_url(link, mask) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Dropping link {:?}: {}", link, e);
                None
            }
        })
        .collect()
}

/// Rewrites whitespace (literal or `%20`) to the title separator
fn canonical_title(link: &str) -> String {
    link.replace("%20", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(TITLE_SEPARATOR)
}
