// src/fetch/http.rs
// =============================================================================
// This module fetches real web pages over HTTP.
//
// How it works:
// 1. GET the page with a shared reqwest Client (connection pooling)
// 2. Reject anything that is not a 2xx response
// 3. Parse the HTML with scraper and collect every <a href>
// 4. Resolve relative links against the page URL (after redirects)
// 5. Optionally keep only links on one host (so we don't crawl the internet)
//
// What we do NOT do here: retries, robots.txt, rate limiting, or URL
// canonicalization. A failed fetch is simply reported and the crawl moves on.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::{FetchError, Fetcher, Page};

// Longest body prefix we keep as a summary when the page has no <title>
const SUMMARY_CHARS: usize = 80;

/// Settings for `HttpFetcher`.
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Per-request timeout
    pub request_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// When set, only links whose host equals this value are followed
    pub allowed_host: Option<String>,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: format!("link-crawler/{}", env!("CARGO_PKG_VERSION")),
            allowed_host: None,
        }
    }
}

/// Fetcher that performs real network requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    allowed_host: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            client,
            allowed_host: config.allowed_host,
        })
    }

    /// Replaces the host restriction (`None` follows links anywhere).
    pub fn with_allowed_host(mut self, host: Option<String>) -> Self {
        self.allowed_host = host;
        self
    }

    /// Follows redirects from `url` with a HEAD request and returns the URL
    /// they end on.
    ///
    /// The status of the final response is not checked; only where it is.
    pub async fn landing_url(&self, url: &str) -> Result<Url, FetchError> {
        let response = self.client.head(Url::parse(url)?).send().await?;
        Ok(response.url().clone())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let requested = Url::parse(url)?;

        let response = self.client.get(requested).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        // reqwest follows redirects, so relative links belong to the page we
        // ended up on, not the one we asked for
        let base = response.url().clone();
        let html = response.text().await?;

        // scraper's Html is not Send, so keep the parse in a sync helper and
        // never hold it across an .await
        Ok(parse_page(&html, &base, self.allowed_host.as_deref()))
    }
}

// Builds a Page from raw HTML: a short summary plus the followable links
fn parse_page(html: &str, base: &Url, allowed_host: Option<&str>) -> Page {
    let document = Html::parse_document(html);

    // Both selectors are constants and known to be valid
    let link_selector = Selector::parse("a[href]").unwrap();
    let title_selector = Selector::parse("title").unwrap();

    let mut urls = Vec::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(link) = resolve_link(base, href) else {
            continue;
        };
        if is_followable(&link, allowed_host) {
            urls.push(link.to_string());
        }
    }

    let title = document
        .select(&title_selector)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let body = match title {
        Some(title) => title,
        None => collapse_whitespace(html).chars().take(SUMMARY_CHARS).collect(),
    };

    Page { body, urls }
}

// Resolves a link (possibly relative) to an absolute URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    // Skip anchors and special protocols
    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    base.join(href).ok()
}

// Only http(s) links, and only on the allowed host when one is configured
fn is_followable(link: &Url, allowed_host: Option<&str>) -> bool {
    if link.scheme() != "http" && link.scheme() != "https" {
        return false;
    }
    match allowed_host {
        Some(host) => link.host_str() == Some(host),
        None => true,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why response.url() instead of the URL we asked for?
//    - reqwest follows redirects for us (up to 10 by default)
//    - /old -> /docs/ means "intro" on that page is /docs/intro, not /intro
//
// 2. What is let-else?
//    - let Some(x) = expr else { continue; };
//    - Binds x when the pattern matches, otherwise runs the else block
//    - The else block must leave the scope (continue, return, break)
//
// 3. Why host_str() and not domain()?
//    - domain() is None for IP addresses like 127.0.0.1
//    - host_str() works for both names and IPs
//
// 4. Why unwrap() on the selectors?
//    - "a[href]" and "title" are constants, known to be valid
//    - If they ever failed it would be a programmer error, so panicking is fine
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resolve_absolute_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "https://other.com");
        assert_eq!(result.map(String::from), Some("https://other.com/".to_string()));
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "/docs");
        assert_eq!(result.map(String::from), Some("https://example.com/docs".to_string()));
    }

    #[test]
    fn test_skip_anchor_and_mailto() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert!(resolve_link(&base, "#section").is_none());
        assert!(resolve_link(&base, "mailto:test@example.com").is_none());
    }

    #[test]
    fn test_parse_page_keeps_order_and_duplicates() {
        let html = r#"
            <html><head><title>  Docs
              Home </title></head>
            <body>
              <a href="/a">A</a>
              <a href="/b">B</a>
              <a href="/a">A again</a>
              <a href="ftp://example.com/file">FTP</a>
            </body></html>
        "#;
        let base = Url::parse("https://example.com/").unwrap();
        let page = parse_page(html, &base, None);

        assert_eq!(page.body, "Docs Home");
        assert_eq!(
            page.urls,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/a",
            ]
        );
    }

    #[test]
    fn test_parse_page_restricts_host() {
        let html = r#"<a href="/local">L</a><a href="https://elsewhere.org/">E</a>"#;
        let base = Url::parse("https://example.com/").unwrap();
        let page = parse_page(html, &base, Some("example.com"));
        assert_eq!(page.urls, vec!["https://example.com/local"]);
    }

    #[test]
    fn test_summary_falls_back_to_body_prefix() {
        let html = format!("<p>{}</p>", "word ".repeat(100));
        let base = Url::parse("https://example.com/").unwrap();
        let page = parse_page(&html, &base, None);
        assert_eq!(page.body.chars().count(), SUMMARY_CHARS);
        assert!(page.body.starts_with("<p>word word"));
    }

    #[tokio::test]
    async fn test_fetch_from_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(
                        r#"<title>Root</title><a href="/next">n</a><a href="https://elsewhere.org/">x</a>"#,
                    ),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(HttpFetcherConfig {
            allowed_host: Some("127.0.0.1".to_string()),
            ..HttpFetcherConfig::default()
        })
        .unwrap();

        let page = fetcher.fetch(&format!("{}/", server.uri())).await.unwrap();
        assert_eq!(page.body, "Root");
        assert_eq!(page.urls, vec![format!("{}/next", server.uri())]);
    }

    #[tokio::test]
    async fn test_relative_links_resolve_against_redirect_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/docs/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(r#"<title>Docs</title><a href="intro">Intro</a>"#),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
        let page = fetcher.fetch(&format!("{}/old", server.uri())).await.unwrap();

        assert_eq!(page.body, "Docs");
        assert_eq!(page.urls, vec![format!("{}/docs/intro", server.uri())]);
    }

    #[tokio::test]
    async fn test_landing_url_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/home"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/home"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
        let landing = fetcher
            .landing_url(&format!("{}/start", server.uri()))
            .await
            .unwrap();

        assert_eq!(landing.as_str(), format!("{}/home", server.uri()));
    }

    #[tokio::test]
    async fn test_with_allowed_host_replaces_restriction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<a href="/here">h</a><a href="https://elsewhere.org/">e</a>"#),
            )
            .mount(&server)
            .await;

        // Starts restricted to a host the server is not on, then follows the server
        let fetcher = HttpFetcher::new(HttpFetcherConfig {
            allowed_host: Some("example.com".to_string()),
            ..HttpFetcherConfig::default()
        })
        .unwrap()
        .with_allowed_host(Some("127.0.0.1".to_string()));

        let page = fetcher.fetch(&format!("{}/", server.uri())).await.unwrap();
        assert_eq!(page.urls, vec![format!("{}/here", server.uri())]);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
