use url::Url;

/// Extracts the host key (authority) from a URL
///
/// The key is the lowercase host followed by `:port` when the URL carries a
/// non-default port. The URL parser already drops ports that match the
/// scheme default, so `http://a.test:80/` and `http://a.test/` share a key.
/// URLs without a host (`file:`, `mailto:`) produce an empty key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkchecker::url::host_key;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(host_key(&url), "example.com");
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), "127.0.0.1:8080");
/// ```
pub fn host_key(url: &Url) -> String {
    let host = match url.host_str() {
        Some(h) => h.to_lowercase(),
        None => return String::new(),
    };

    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}
