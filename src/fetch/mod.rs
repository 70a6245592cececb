//! Document source: one bounded GET of a storefront page.

use std::error::Error as _;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA, USER_AGENT};
use tokio::time::timeout;
use url::Url;

use crate::error::DetectError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/91.0.4472.124 Safari/537.36 StoreSleuthBot/1.0";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
}

impl FetchConfig {
    /// `--timeout-secs`, else `SLEUTH_FETCH_TIMEOUT_SECS`, else 10 seconds.
    pub fn resolve(timeout_secs: Option<u64>) -> Self {
        let secs = timeout_secs
            .or_else(|| std::env::var("SLEUTH_FETCH_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);
        FetchConfig { timeout: Duration::from_secs(secs) }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig { timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS) }
    }
}

/// Raw HTML of a page that answered 2xx.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub status: u16,
    pub html: String,
}

/// Prefix `https://` when no scheme is given, reject any other than http(s),
/// then require an absolute URL with a host.
pub fn normalize_url(input: &str) -> Result<Url, DetectError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DetectError::missing_url());
    }
    let candidate = match explicit_scheme(input) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => input.to_string(),
        Some(_) => return Err(DetectError::malformed_url()),
        None => format!("https://{input}"),
    };
    let url = Url::parse(&candidate).map_err(|_| DetectError::malformed_url())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(DetectError::malformed_url());
    }
    Ok(url)
}

// `scheme://` at the start of the input. Bare `host:port` has no `//` and
// stays on the prefix path.
fn explicit_scheme(input: &str) -> Option<&str> {
    let re = Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]*)://").ok()?;
    re.captures(input).and_then(|c| c.get(1)).map(|m| m.as_str())
}

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, DetectError> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| DetectError::Unhandled(e.to_string()))?;
        Ok(Fetcher { client, config })
    }

    pub fn config(&self) -> FetchConfig { self.config }

    /// Single attempt, no retries. The bound covers both the request and the
    /// body read; on expiry the in-flight future is dropped.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedDocument, DetectError> {
        match timeout(self.config.timeout, self.fetch_inner(url)).await {
            Ok(res) => res,
            Err(_) => Err(DetectError::Timeout),
        }
    }

    async fn fetch_inner(&self, url: &Url) -> Result<FetchedDocument, DetectError> {
        let resp = self.client.get(url.as_str()).send().await.map_err(classify_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DetectError::UpstreamHttp {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        let html = resp.text().await.map_err(classify_error)?;
        Ok(FetchedDocument { status: status.as_u16(), html })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

fn classify_error(error: reqwest::Error) -> DetectError {
    if error.is_timeout() {
        return DetectError::Timeout;
    }
    if is_dns_failure(&error) {
        return DetectError::DnsFailure;
    }
    DetectError::Unhandled(error.to_string())
}

// hyper reports resolver failures as "dns error: ..." somewhere down the
// source chain; the OS message varies by platform.
fn is_dns_failure(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = error.source();
    let mut text = error.to_string().to_lowercase();
    while let Some(e) = source {
        text.push_str(" | ");
        text.push_str(&e.to_string().to_lowercase());
        source = e.source();
    }
    ["dns error", "failed to lookup address", "name or service not known", "no such host", "nodename nor servname"]
        .iter()
        .any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn normalize_prefixes_https() {
        let url = normalize_url("shop.example.com/path").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/path");
    }

    #[test]
    fn normalize_keeps_explicit_scheme() {
        assert_eq!(normalize_url("http://a.example").unwrap().scheme(), "http");
        assert_eq!(normalize_url("HTTPS://a.example").unwrap().scheme(), "https");
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(matches!(normalize_url("not a url"), Err(DetectError::InvalidInput(_))));
        assert!(matches!(normalize_url(""), Err(DetectError::InvalidInput(_))));
        assert!(matches!(normalize_url("   "), Err(DetectError::InvalidInput(_))));
        assert!(matches!(normalize_url("ftp://files.example"), Err(DetectError::InvalidInput(_))));
    }

    #[test]
    fn other_schemes_are_rejected_not_prefixed() {
        for input in ["ftp://files.example", "file:///etc/passwd", "ws://shop.example", "javascript://x"] {
            assert!(matches!(normalize_url(input), Err(DetectError::InvalidInput(_))), "{input}");
        }
    }

    #[test]
    fn bare_host_with_port_gets_https() {
        let url = normalize_url("shop.example:8443/store").unwrap();
        assert_eq!(url.as_str(), "https://shop.example:8443/store");
    }

    #[test]
    fn config_prefers_explicit_value() {
        assert_eq!(FetchConfig::resolve(Some(3)).timeout, Duration::from_secs(3));
        assert_eq!(FetchConfig::resolve(Some(0)).timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn fetch_returns_body_and_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("cache-control", "no-cache"))
            .and(header("pragma", "no-cache"))
            .and(header_regex("user-agent", "StoreSleuthBot/1.0$"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let doc = fetcher.fetch(&url).await.unwrap();
        assert_eq!(doc.status, 200);
        assert_eq!(doc.html, "<html>ok</html>");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        match fetcher.fetch(&url).await {
            Err(DetectError::UpstreamHttp { status, reason }) => {
                assert_eq!(status, 403);
                assert_eq!(reason, "Forbidden");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(FetchConfig { timeout: Duration::from_millis(200) }).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, DetectError::Timeout));
        assert_eq!(err.status_code(), 504);
    }

    #[tokio::test]
    async fn refused_connection_is_not_a_timeout() {
        let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, DetectError::Unhandled(_)));
    }
}
