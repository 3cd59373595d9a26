//! HTTP access to hypermedia resources.
//!
//! Every call is one round trip: no retries, no caching. Non-2xx answers
//! are errors, never resources.

use crate::config::ClientConfig;
use crate::error::{DealError, DealErrorKind};
use crate::links::{Hypermedia, resolve_link};
use crate::resources::LinkedResource;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, LOCATION};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// A response that passed the status check, body not yet decoded.
#[derive(Debug, Clone)]
pub struct RawResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl RawResponse {
    /// Status code; always 2xx.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Decodes the body into a typed resource.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Fetched<T>, DealError> {
        let body = serde_json::from_str(&self.body).map_err(|e| {
            DealError::new(DealErrorKind::Decode {
                url: self.url.to_string(),
                reason: e.to_string(),
            })
        })?;

        Ok(Fetched {
            url: self.url,
            body,
        })
    }

    /// The `Location` header, resolved against the request URL.
    pub fn location(&self) -> Result<Url, DealError> {
        let missing = || {
            DealError::new(DealErrorKind::MissingLocationHeader {
                url: self.url.to_string(),
            })
        };

        let value = self
            .headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(missing)?;

        self.url.join(value.trim()).map_err(|e| {
            DealError::new(DealErrorKind::Decode {
                url: self.url.to_string(),
                reason: format!("invalid Location header '{}': {}", value, e),
            })
        })
    }
}

/// A decoded resource together with the URL it was fetched from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    url: Url,
    body: T,
}

impl<T> Fetched<T> {
    /// The URL this resource was fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Drops the envelope and keeps the payload.
    pub fn into_body(self) -> T {
        self.body
    }
}

impl<T: Hypermedia> Fetched<T> {
    /// Resolves a relation on this resource, relative to where it was fetched.
    pub fn link(&self, rel: &str) -> Result<Url, DealError> {
        resolve_link(&self.body, &self.url, rel)
    }
}

/// Performs HTTP verbs against resource URLs.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ResourceFetcher {
    client: reqwest::Client,
}

impl ResourceFetcher {
    /// Builds a fetcher with the configured timeouts and user agent.
    #[instrument(skip(config), fields(timeout_secs = config.request_timeout_secs()))]
    pub fn new(config: &ClientConfig) -> Result<Self, DealError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent().as_str())
            .build()
            .map_err(|e| {
                DealError::new(DealErrorKind::Config {
                    message: format!("failed to build HTTP client: {}", e),
                })
            })?;

        Ok(Self { client })
    }

    /// GETs a resource and decodes it.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<Fetched<T>, DealError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        self.send::<()>(Method::GET, url, None, headers).await?.decode()
    }

    /// Fetches `url` and resolves one of its relations.
    ///
    /// For when only the resource URL is at hand, not the resource.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn resolve(&self, url: &Url, rel: &str) -> Result<Url, DealError> {
        self.get::<LinkedResource>(url).await?.link(rel)
    }

    /// POSTs without a body.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn post(&self, url: &Url) -> Result<RawResponse, DealError> {
        self.send::<()>(Method::POST, url, None, HeaderMap::new()).await
    }

    /// POSTs a JSON body (`Content-Type: application/json`).
    #[instrument(skip(self, url, body), fields(url = %url))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<RawResponse, DealError> {
        self.send(Method::POST, url, Some(body), HeaderMap::new()).await
    }

    /// DELETEs a resource.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn delete(&self, url: &Url) -> Result<RawResponse, DealError> {
        self.send::<()>(Method::DELETE, url, None, HeaderMap::new()).await
    }

    /// Sends one request with an optional JSON body and extra headers.
    ///
    /// Every verb above goes through here.
    #[instrument(skip(self, url, body, headers), fields(url = %url, headers = headers.len()))]
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<RawResponse, DealError> {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(method, url, request).await
    }

    async fn execute(
        &self,
        method: Method,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<RawResponse, DealError> {
        debug!(%method, %url, "Sending request");

        let transport = |e: reqwest::Error| {
            let reason = if e.is_timeout() {
                format!("request timed out: {}", e)
            } else {
                e.to_string()
            };
            warn!(%method, %url, reason = %reason, "Request failed");
            DealError::new(DealErrorKind::Transport {
                method: method.to_string(),
                url: url.to_string(),
                reason,
            })
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(transport)?;

        debug!(%method, %url, status = status.as_u16(), "Received response");

        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), body = %body, "Server rejected request");
            return Err(DealError::new(DealErrorKind::HttpStatus {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            }));
        }

        Ok(RawResponse {
            url: url.clone(),
            status,
            headers,
            body,
        })
    }
}
