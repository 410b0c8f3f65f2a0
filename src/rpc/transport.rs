//! HTTP transport for the batch-RPC interface.
//!
//! The [`Transport`] trait is the only seam between the operation client and
//! the network; tests drive the client through a scripted implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::NblmError;

/// Host the service redirects to once the session cookies stop authenticating.
pub const LOGIN_HOST: &str = "accounts.google.com";

const RPC_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Navigation headers the landing page insists on before it embeds tokens.
const PAGE_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.9"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"143\", \"Chromium\";v=\"143\", \"Not A(Brand\";v=\"24\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"macOS\""),
];

/// A fetched HTML page along with where the request finally landed.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// Network round trips needed by the client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a form-encoded body and return the raw response text.
    ///
    /// Fails with [`NblmError::AuthExpired`] when the request ends up on the
    /// login host, and with [`NblmError::Http`] on a non-success status.
    async fn post_form(&self, url: &str, body: String) -> Result<String, NblmError>;

    /// GET an HTML page as a browser navigation would.
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, NblmError>;
}

/// True when `url` points at the login host.
pub fn is_login_url(url: &str) -> bool {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|h| h == LOGIN_HOST))
        .unwrap_or(false)
}

/// Timeouts for the two kinds of request.
#[derive(Debug, Clone, Copy)]
pub struct TransportTimeouts {
    pub rpc: Duration,
    pub page: Duration,
}

impl Default for TransportTimeouts {
    fn default() -> Self {
        Self {
            rpc: Duration::from_secs(30),
            page: Duration::from_secs(15),
        }
    }
}

/// reqwest-backed transport carrying the session cookies on every request.
pub struct HttpTransport {
    rpc: reqwest::Client,
    page: reqwest::Client,
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, NblmError> {
    HeaderValue::from_str(value)
        .map_err(|_| NblmError::Config(format!("Invalid characters in {name} header")))
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        cookie_header: &str,
        timeouts: TransportTimeouts,
    ) -> Result<Self, NblmError> {
        let cookie = header_value("Cookie", cookie_header)?;

        let mut rpc_headers = HeaderMap::new();
        rpc_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded;charset=UTF-8"),
        );
        rpc_headers.insert(header::ORIGIN, header_value("Origin", base_url)?);
        rpc_headers.insert(
            header::REFERER,
            header_value("Referer", &format!("{base_url}/"))?,
        );
        rpc_headers.insert(header::COOKIE, cookie.clone());
        rpc_headers.insert(
            HeaderName::from_static("x-same-domain"),
            HeaderValue::from_static("1"),
        );
        rpc_headers.insert(header::USER_AGENT, HeaderValue::from_static(RPC_USER_AGENT));

        let mut page_headers = HeaderMap::new();
        page_headers.insert(header::USER_AGENT, HeaderValue::from_static(PAGE_USER_AGENT));
        for &(name, value) in PAGE_HEADERS {
            page_headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        page_headers.insert(header::COOKIE, cookie);

        let rpc = reqwest::Client::builder()
            .default_headers(rpc_headers)
            .timeout(timeouts.rpc)
            .build()?;
        let page = reqwest::Client::builder()
            .default_headers(page_headers)
            .timeout(timeouts.page)
            .build()?;

        Ok(Self { rpc, page })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<String, NblmError> {
        let response = self.rpc.post(url).body(body).send().await?;

        if is_login_url(response.url().as_str()) {
            return Err(NblmError::AuthExpired);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(NblmError::Http {
                status: status.as_u16(),
                endpoint: response.url().path().to_string(),
            });
        }

        Ok(response.text().await?)
    }

    async fn fetch_page(&self, url: &str) -> Result<PageResponse, NblmError> {
        let response = self.page.get(url).send().await?;
        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(PageResponse {
            final_url,
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_detection() {
        assert!(is_login_url(
            "https://accounts.google.com/ServiceLogin?continue=https://notebooklm.google.com/"
        ));
        assert!(!is_login_url("https://notebooklm.google.com/"));
        assert!(!is_login_url(
            "https://notebooklm.google.com/?next=accounts.google.com"
        ));
        assert!(!is_login_url("not a url"));
    }

    #[test]
    fn test_rejects_cookie_with_newline() {
        let result = HttpTransport::new(
            "https://notebooklm.google.com",
            "SID=a\nb",
            TransportTimeouts::default(),
        );
        assert!(matches!(result, Err(NblmError::Config(_))));
    }

    #[test]
    fn test_builds_with_plain_cookies() {
        let result = HttpTransport::new(
            "https://notebooklm.google.com",
            "SID=a; HSID=b",
            TransportTimeouts::default(),
        );
        assert!(result.is_ok());
    }
}
