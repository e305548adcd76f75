//! HTML link extraction
//!
//! Collects the raw `href` values of a document, in document order, for the
//! normalizer to resolve and filter.

use scraper::{Html, Selector};

/// Extracts every `href` attribute value from an HTML document
///
/// # Extraction Rules
///
/// - Any element carrying `href` counts (`<a>`, `<link>`, `<area>`, ...)
/// - Values are taken as written, entities decoded, in document order
/// - The fragment (`#...`) is cut off; values left empty are skipped
/// - Nothing is resolved or deduplicated here
///
/// # Example
///
/// ```
/// use linkchecker::checker::extract_links;
///
/// let html = r##"<a href="/docs#intro">Docs</a><a href="#top">Top</a>"##;
/// assert_eq!(extract_links(html), ["/docs"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| {
            let href = match href.find('#') {
                Some(idx) => &href[..idx],
                None => href,
            };
            if href.trim().is_empty() {
                None
            } else {
                Some(href.to_string())
            }
        })
        .collect()
}
