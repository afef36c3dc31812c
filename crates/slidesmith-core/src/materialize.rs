//! Image materialization: turn an externally referenced image URL into a
//! self-contained `data:` URI.
//!
//! Fetches go through an image proxy rather than the origin so that
//! hot-linking and cross-origin restrictions on the source site do not
//! break the deck. Failure here is an expected branch, not an exception:
//! every failure path logs and yields `None`, and a deck with some missing
//! images is still a successful run.

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::CONTENT_TYPE;
use url::Url;

pub const DEFAULT_PROXY_URL: &str = "https://images.weserv.nl/";

#[derive(Debug)]
pub struct ImageMaterializer {
    client: reqwest::Client,
    proxy_url: String,
}

impl ImageMaterializer {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            proxy_url: DEFAULT_PROXY_URL.to_owned(),
        }
    }

    /// Override the proxy endpoint. Used for alternate deployments and tests.
    #[must_use]
    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = url.into();
        self
    }

    /// Fetch `url` through the proxy and re-encode it as a `data:` URI.
    ///
    /// Returns `None` for an empty input (without a network call), a
    /// transport failure, a non-success status, or a response whose content
    /// type is not an image. Never errors.
    pub async fn materialize(&self, url: &str) -> Option<String> {
        if url.trim().is_empty() {
            return None;
        }

        let proxied = match self.proxied(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(%url, error = %e, "invalid image proxy configuration");
                return None;
            }
        };

        let response = match self.client.get(proxied).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%url, error = %e, "image fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "image proxy returned non-success status");
            return None;
        }

        // A proxy can answer 200 with an HTML error page; trust the content
        // type, not the status.
        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .unwrap_or_default()
            .trim()
            .to_owned();
        if !mime.starts_with("image/") {
            tracing::warn!(%url, content_type = %mime, "proxy returned non-image content");
            return None;
        }

        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to read image body");
                return None;
            }
        };

        Some(format!("data:{mime};base64,{}", STANDARD.encode(&bytes)))
    }

    fn proxied(&self, url: &str) -> Result<Url, url::ParseError> {
        let mut proxied = Url::parse(&self.proxy_url)?;
        proxied.query_pairs_mut().append_pair("url", url);
        Ok(proxied)
    }
}
