// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Snyk REST API.
//!
//! Provides [`SnykClient`], which owns the authenticated connection pool and
//! implements request construction, JSON:API decoding, and `links.next`
//! pagination. The per-resource operations live in sibling modules as
//! further `impl SnykClient` blocks.

use std::time::Duration;

use brokersync_config::ApiConfig;
use brokersync_core::BrokerError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{ListDocument, Resource};

/// Media type for JSON:API request and response bodies.
pub const JSON_API: &str = "application/vnd.api+json";

/// Authenticated client for the Snyk REST API.
///
/// Built once per process from an explicit token and [`ApiConfig`]; there is
/// no shared global session.
#[derive(Debug, Clone)]
pub struct SnykClient {
    http: reqwest::Client,
    base_url: String,
    tenant_id: Option<String>,
    pub(crate) version: String,
    pub(crate) broker_version: String,
    pub(crate) fallback_versions: Vec<String>,
    pub(crate) page_limit: u32,
}

/// Status and decoded body of one API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Parsed JSON body; `Null` for empty bodies, a JSON string for non-JSON error bodies.
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Decodes the body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BrokerError> {
        serde_json::from_value(self.body.clone()).map_err(|e| BrokerError::InvalidResponse {
            message: format!("failed to decode {} response: {e}", self.status),
            source: Some(Box::new(e)),
        })
    }

    /// Body rendered for log lines.
    pub fn text(&self) -> String {
        match &self.body {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Outcome of walking a paginated listing.
#[derive(Debug)]
pub(crate) enum Pages {
    /// Every page returned 200; resources in API order.
    Complete(Vec<Resource>),
    /// A page returned this non-200 status; collected resources are discarded.
    Status(StatusCode),
}

impl SnykClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `token` - API token, sent as `Authorization: token <token>`
    /// * `api` - base URL, tenant, dated versions, page size and timeout
    pub fn new(token: SecretString, api: &ApiConfig) -> Result<Self, BrokerError> {
        let mut auth = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
            .map_err(|e| BrokerError::Config(format!("invalid API token header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| BrokerError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            tenant_id: api.tenant_id.clone().filter(|t| !t.trim().is_empty()),
            version: api.version.clone(),
            broker_version: api.broker_version.clone(),
            fallback_versions: api.fallback_versions.clone(),
            page_limit: api.page_limit,
        })
    }

    /// Returns the REST base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the tenant id, or a configuration error when none was given.
    pub fn tenant_id(&self) -> Result<&str, BrokerError> {
        self.tenant_id
            .as_deref()
            .ok_or_else(|| BrokerError::Config("tenant id must be provided".into()))
    }

    /// Builds an absolute URL from path segments and query parameters.
    ///
    /// Each segment is percent-encoded on its own, so ids can never add
    /// path components or a query string.
    pub(crate) fn url(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, BrokerError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BrokerError::Config(format!("invalid API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                BrokerError::Config(format!("API base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Resolves a `links.next` value, which may be absolute or root-relative.
    pub(crate) fn resolve_next(&self, next: &str) -> Result<Url, BrokerError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| BrokerError::Config(format!("invalid API base URL: {e}")))?;
        base.join(next).map_err(|e| BrokerError::InvalidResponse {
            message: format!("invalid pagination link `{next}`: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends one request and decodes the response body.
    ///
    /// Any HTTP status is returned as `Ok`; only transport and decoding
    /// failures are errors.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, BrokerError> {
        debug!(method = %method, url = %url, "api request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            debug!(body = %body, "api request body");
            let bytes = serde_json::to_vec(body).map_err(|e| BrokerError::Internal(format!(
                "failed to encode request body: {e}"
            )))?;
            request = request.header(CONTENT_TYPE, JSON_API).body(bytes);
        }

        let response = request.send().await.map_err(|e| BrokerError::Http {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| BrokerError::Http {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(status = status.as_u16(), "api response");

        let body = if raw.trim().is_empty() {
            serde_json::Value::Null
        } else {
            match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) if status.is_success() => {
                    return Err(BrokerError::InvalidResponse {
                        message: format!("failed to parse {status} response body: {e}"),
                        source: Some(Box::new(e)),
                    });
                }
                Err(_) => serde_json::Value::String(raw),
            }
        };

        let response = ApiResponse { status, body };
        if status.as_u16() >= 400 {
            debug!(status = status.as_u16(), body = %response.text(), "api error response");
        }
        Ok(response)
    }

    /// GET with a dated `version` query parameter.
    pub(crate) async fn get(
        &self,
        segments: &[&str],
        version: &str,
    ) -> Result<ApiResponse, BrokerError> {
        let url = self.url(segments, &[("version", version)])?;
        self.send(Method::GET, url, None).await
    }

    /// Walks every page of a listing by following `links.next`.
    ///
    /// An empty page ends the walk even if a next link is present.
    pub(crate) async fn get_all_pages(
        &self,
        segments: &[&str],
        version: &str,
    ) -> Result<Pages, BrokerError> {
        let limit = self.page_limit.to_string();
        let mut url = self.url(segments, &[("version", version), ("limit", limit.as_str())])?;
        let mut resources = Vec::new();
        let mut page = 1;

        loop {
            let response = self.send(Method::GET, url.clone(), None).await?;
            if response.status != StatusCode::OK {
                return Ok(Pages::Status(response.status));
            }

            let document: ListDocument = response.decode()?;
            if document.data.is_empty() {
                break;
            }
            resources.extend(document.data);
            debug!(page, total = resources.len(), "fetched page");

            let Some(next) = document.links.and_then(|l| l.next) else {
                break;
            };
            let next_url = self.resolve_next(&next)?;
            if next_url == url {
                warn!(url = %url, "pagination link points at the current page, stopping");
                break;
            }
            url = next_url;
            page += 1;
        }

        Ok(Pages::Complete(resources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_client;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn url_appends_path_and_query() {
        let client = test_client("https://api.example.com");
        let url = client.url(&["orgs", "o1"], &[("version", "2024-10-15")]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/rest/orgs/o1?version=2024-10-15");
    }

    #[test]
    fn url_escapes_reserved_characters_in_ids() {
        let client = test_client("https://api.example.com");
        let url = client.url(&["orgs", "a/b?c#d"], &[("version", "v")]).unwrap();
        assert_eq!(url.path(), "/rest/orgs/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), Some("version=v"));
    }

    #[test]
    fn url_on_bare_host_and_trailing_slash() {
        let bare = test_client_at("https://api.example.com");
        let url = bare.url(&["orgs"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/orgs");

        let slashed = test_client_at("https://api.example.com/rest/");
        let url = slashed.url(&["orgs", "o1"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/rest/orgs/o1");
    }

    #[tokio::test]
    async fn ids_with_slashes_stay_one_segment_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.get(&["orgs", "a/b"], "2024-10-15").await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn resolve_next_handles_relative_and_absolute_links() {
        let client = test_client("https://api.example.com");
        let relative = client.resolve_next("/rest/groups/g/orgs?starting_after=abc").unwrap();
        assert_eq!(
            relative.as_str(),
            "https://api.example.com/rest/groups/g/orgs?starting_after=abc"
        );
        let absolute = client
            .resolve_next("https://other.example.com/rest/groups/g/orgs?page=2")
            .unwrap();
        assert_eq!(absolute.host_str(), Some("other.example.com"));
    }

    fn test_client_at(base_url: &str) -> SnykClient {
        let api = ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        };
        SnykClient::new(SecretString::from("t".to_string()), &api).unwrap()
    }

    #[test]
    fn missing_tenant_is_config_error() {
        let api = ApiConfig::default();
        let client = SnykClient::new(SecretString::from("t".to_string()), &api).unwrap();
        assert!(client.tenant_id().unwrap_err().is_config());
    }

    #[tokio::test]
    async fn client_sends_auth_and_content_type_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs"))
            .and(query_param("version", "2024-10-15"))
            .and(header("authorization", "token test-token"))
            .and(header("content-type", JSON_API))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.get(&["orgs"], "2024-10-15").await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.get(&["orgs"], "2024-10-15").await.unwrap();
        assert_eq!(response.status.as_u16(), 502);
        assert_eq!(response.text(), "bad gateway");
    }

    #[tokio::test]
    async fn malformed_success_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get(&["orgs"], "2024-10-15").await.unwrap_err();
        assert!(matches!(err, BrokerError::InvalidResponse { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        let client = test_client("http://127.0.0.1:1");
        let err = client.get(&["orgs"], "2024-10-15").await.unwrap_err();
        assert!(matches!(err, BrokerError::Http { .. }), "got: {err}");
    }
}
