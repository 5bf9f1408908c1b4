// REST client for the package-management API
//
// Wraps `reqwest::Client` with URL construction, bearer-token auth, and
// error-body parsing. Endpoint groups (packages, routers) are implemented
// as inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::ErrorResponse;

/// Async client for the package/router REST API.
///
/// Cheap to clone: the inner `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Request budget, when this client built its own `reqwest::Client`.
    timeout: Option<Duration>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    ///
    /// Injects `Authorization: Bearer <token>` as a default header on
    /// every request.
    pub fn from_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: Some(transport.timeout),
        })
    }

    /// Build without credentials, for APIs behind another auth layer.
    pub fn from_transport(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: Some(transport.timeout),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: None,
        })
    }

    /// The API base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(raw.to_owned()));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments onto the base URL, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are validated in the constructor, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");
        let resp = self.send(self.http.get(url).query(params)).await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        let resp = self.send(self.http.put(url).json(body)).await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.send(self.http.delete(url)).await?;
        Self::handle_empty(resp).await
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        req.send().await.map_err(|e| match self.timeout {
            Some(budget) if e.is_timeout() => Error::Timeout {
                timeout_secs: budget.as_secs(),
            },
            _ => Error::Transport(e),
        })
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "response body received");
        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed: ErrorResponse = serde_json::from_str(&raw).unwrap_or_default();
        let message = parsed.message.or(parsed.error);

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication {
                message: message.unwrap_or_else(|| "token rejected or missing".into()),
            },
            reqwest::StatusCode::FORBIDDEN => Error::Forbidden {
                message: message.unwrap_or_else(|| "insufficient permissions (HTTP 403)".into()),
            },
            _ => Error::Api {
                status: status.as_u16(),
                message,
                code: parsed.code,
            },
        }
    }
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
