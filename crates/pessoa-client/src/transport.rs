//! The configured HTTP client shared by all remote operations.

use std::time::Duration;

use pessoa_core::{
  Error, Result,
  wire::{Envelope, ErrorBody},
};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default backend origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5258";

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Per-request timeout. `None` waits indefinitely.
  pub timeout:  Option<Duration>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout:  None,
    }
  }
}

/// The HTTP client could not be constructed.
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct BuildError(#[from] reqwest::Error);

/// Async HTTP client for the Pessoas REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] (and its cookie jar) is
/// `Arc`-based, so clones share one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, BuildError> {
    let mut builder = Client::builder().cookie_store(true);
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ApiConfig { &self.config }

  pub(crate) fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.client.request(method, self.url(path))
  }

  /// Like [`ApiClient::request`], with `segment` appended to `path` as one
  /// percent-encoded path segment.
  pub(crate) fn request_with_segment(
    &self,
    method: Method,
    path: &str,
    segment: &str,
  ) -> Result<RequestBuilder> {
    let mut url = Url::parse(&self.url(path)).map_err(|e| Error::Transport(e.to_string()))?;
    url
      .path_segments_mut()
      .map_err(|()| Error::Transport("base URL cannot carry a path".into()))?
      .pop_if_empty()
      .push(segment);
    Ok(self.client.request(method, url))
  }

  /// Send `req` and unwrap the `{"data": T}` envelope.
  pub(crate) async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
    let resp = send(req).await?;
    let envelope: Envelope<T> = resp
      .json()
      .await
      .map_err(|e| Error::Decode(e.to_string()))?;
    Ok(envelope.data)
  }

  /// Send `req`, discarding any successful body.
  pub(crate) async fn execute(&self, req: RequestBuilder) -> Result<()> {
    send(req).await.map(drop)
  }
}

/// Send `req`; any non-2xx status becomes [`Error::Status`] carrying the
/// error envelope's `message` when the body has one.
async fn send(req: RequestBuilder) -> Result<Response> {
  let resp = req
    .send()
    .await
    .map_err(|e| Error::Transport(e.to_string()))?;

  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  let message = resp
    .text()
    .await
    .ok()
    .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
    .and_then(|body| body.message);
  tracing::debug!(status = status.as_u16(), ?message, "request rejected");
  Err(Error::Status {
    status: status.as_u16(),
    message,
  })
}
