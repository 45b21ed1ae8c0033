use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("building http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid url {0}: {1}")]
    Url(String, String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Anything that can turn a URL into page markup.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Plain blocking GET. No retries, no custom headers, no request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        // The blocking client otherwise gives up after 30 s.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(FetchError::Client)?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url.clone()).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(transport)
    }
}

// ── URLs ──

/// `{base}/{category}/`
pub fn category_url(base: &str, category: &str) -> Result<Url, FetchError> {
    page_url(base, &[category])
}

/// `{base}/{category}/{brand}/`; the brand text is percent-encoded as a path segment.
pub fn brand_url(base: &str, category: &str, brand: &str) -> Result<Url, FetchError> {
    page_url(base, &[category, brand])
}

fn page_url(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::Url(base.to_string(), e.to_string()))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| FetchError::Url(base.to_string(), "cannot be a base".into()))?;
        path.pop_if_empty();
        path.extend(segments);
        path.push("");
    }
    Ok(url)
}
