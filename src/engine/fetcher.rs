//! Initial page fetch
//!
//! This module handles the one HTTP request every analysis starts with:
//! - Building the page client with the crawler User-Agent and redirect limit
//! - Timing the response and keeping its headers for extraction
//! - Classifying failures into the errors `analyze` reports

use crate::config::Config;
use crate::extract::ResponseContext;
use crate::SeoscopeError;
use reqwest::header::{HeaderMap, ACCEPT_ENCODING, CONTENT_ENCODING};
use reqwest::{redirect::Policy, Client};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

/// Encodings offered when probing for response compression
const OFFERED_ENCODINGS: &str = "gzip, deflate, br";

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    pub status: u16,
    pub body: String,
    /// Timing and headers for the extraction pipeline
    pub context: ResponseContext,
}

/// Builds the HTTP client used for page fetches
///
/// # Arguments
///
/// * `config` - The full configuration (User-Agent and `[http]` section)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.http.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(config.http.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds a client that leaves `Content-Encoding` intact
///
/// The page client decompresses transparently, which strips the header, so
/// compression is observed with a separate HEAD request through this one.
fn build_probe_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .redirect(Policy::limited(config.http.max_redirects))
        .gzip(false)
        .brotli(false)
        .build()
}

/// Fetches the pages under analysis
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    probe_client: Client,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            probe_client: build_probe_client(config)?,
        })
    }

    /// Fetches a page with a GET request
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request or body read timed out | `Timeout` |
    /// | Non-2xx final status | `HttpStatus` |
    /// | DNS, connect, TLS or redirect failure | `FetchFailed` |
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, SeoscopeError> {
        let start = Instant::now();

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(SeoscopeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut headers = lowercase_headers(response.headers());

        let body = response.text().await.map_err(|e| classify_error(url, e))?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        if !headers.contains_key("content-encoding") {
            if let Some(encoding) = self.probe_compression(&final_url).await {
                headers.insert("content-encoding".to_string(), encoding);
            }
        }

        tracing::debug!(
            "Fetched {} ({} bytes, HTTP {}, {}ms)",
            final_url,
            body.len(),
            status.as_u16(),
            response_time_ms
        );

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
            context: ResponseContext {
                status: status.as_u16(),
                response_time_ms,
                headers,
            },
        })
    }

    /// `Content-Encoding` the server applies when compression is offered
    async fn probe_compression(&self, url: &Url) -> Option<String> {
        let response = match self
            .probe_client
            .head(url.as_str())
            .header(ACCEPT_ENCODING, OFFERED_ENCODINGS)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Compression probe of {} failed: {}", url, e);
                return None;
            }
        };

        response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> SeoscopeError {
    if error.is_timeout() {
        SeoscopeError::Timeout {
            url: url.to_string(),
        }
    } else {
        SeoscopeError::FetchFailed {
            url: url.to_string(),
            source: error,
        }
    }
}

fn lowercase_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            // Repeated headers keep their first value
            map.entry(name.as_str().to_ascii_lowercase())
                .or_insert_with(|| value.to_string());
        }
    }
    map
}
