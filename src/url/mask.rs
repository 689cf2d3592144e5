use crate::UrlError;
use url::Url;

/// Resolves the site mask (scheme + host prefix) of a URL
///
/// The mask is the base every extracted link is resolved against. An
/// explicit port is kept so the mask still addresses the same server.
///
/// # Examples
///
/// ```
/// use wiki_ranker::url::site_mask;
///
/// let mask = site_mask("https://en.wikipedia.org/wiki/Superintendent").unwrap();
/// assert_eq!(mask.as_str(), "https://en.wikipedia.org/");
///
/// let mask = site_mask("http://127.0.0.1:8080/wiki/Start").unwrap();
/// assert_eq!(mask.as_str(), "http://127.0.0.1:8080/");
/// ```
pub fn site_mask(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;

    let mask = match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    };

    Url::parse(&mask).map_err(|e| UrlError::Malformed(format!("Bad mask '{}': {}", mask, e)))
}
