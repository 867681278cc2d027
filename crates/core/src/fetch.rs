//! HTTP transport used by the client.
//!
//! Every request the client makes goes through the [`Transport`] trait, so
//! tests can swap the network for a stub. [`HttpTransport`] is the blocking
//! reqwest implementation. Cookies are not kept here: the session supplies
//! a `Cookie` header per request and reads `Set-Cookie` headers back from
//! the response.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, SET_COOKIE, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::{OrdbogError, Result};

/// HTTP client configuration.
///
/// This struct controls timeout and user agent settings for HTTP requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request as the client composes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// JSON body, POST only.
    pub body: Option<String>,
    /// Value for the `Cookie` header, if the session holds any cookies.
    pub cookie_header: Option<String>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self { method: Method::Get, url, body: None, cookie_header: None }
    }

    pub fn post_json(url: Url, body: String) -> Self {
        Self { method: Method::Post, url, body: Some(body), cookie_header: None }
    }

    pub fn with_cookies(mut self, cookie_header: Option<String>) -> Self {
        self.cookie_header = cookie_header;
        self
    }
}

/// The parts of a response the client looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Raw `Set-Cookie` header values in the order received.
    pub set_cookies: Vec<String>,
}

impl HttpResponse {
    /// A 200 response with the given body and no cookies.
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into(), set_cookies: Vec::new() }
    }
}

/// Sends requests for the client.
///
/// Implementations block until the exchange completes.
pub trait Transport {
    /// Performs one request.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::HttpError`] or [`OrdbogError::Timeout`] when the
    /// exchange could not complete. Non-2xx statuses are not errors.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking reqwest transport.
pub struct HttpTransport {
    client: Client,
    config: FetchConfig,
}

impl HttpTransport {
    /// Builds the underlying reqwest client.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(OrdbogError::HttpError)?;

        Ok(Self { client, config })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = ?request.method, url = %request.url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(request.url.clone()),
            Method::Post => self.client.post(request.url.clone()),
        }
        .header(USER_AGENT, &self.config.user_agent)
        .header(ACCEPT, "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8")
        .header(ACCEPT_LANGUAGE, "da-DK,da;q=0.9,en;q=0.8");

        if let Some(cookies) = &request.cookie_header {
            builder = builder.header(COOKIE, cookies);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body.clone());
        }

        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                OrdbogError::Timeout { timeout: self.config.timeout }
            } else {
                OrdbogError::HttpError(e)
            }
        })?;

        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response.text()?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body, set_cookies })
    }
}
