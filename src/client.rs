//! Request Adapter: one outbound HTTP call to the rendering service.
//!
//! A [`RemoteCall`] is derived deterministically from validated tool
//! parameters. [`RenderClient::execute`] joins its path onto the configured
//! base URL, attaches the API key header when one is configured, applies the
//! configured timeout and returns the raw bytes. There are no retries.

use crate::config::RenderConfig;
use crate::error::ToolError;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "X-QuickChart-Api-Key";

/// Payload of a remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteBody {
    /// JSON request body, sent with `Content-Type: application/json`.
    Json(Value),
    /// URL query pairs, for GET endpoints.
    Query(Vec<(&'static str, String)>),
}

/// Fully resolved outbound request, minus the transport-level headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub method: Method,
    pub path: &'static str,
    pub body: RemoteBody,
    /// Output format the caller asked for, used when the mime type is not
    /// taken from the response.
    pub format: &'static str,
}

impl RemoteCall {
    pub fn post_json(path: &'static str, body: Value, format: &'static str) -> Self {
        Self {
            method: Method::POST,
            path,
            body: RemoteBody::Json(body),
            format,
        }
    }

    pub fn get_query(
        path: &'static str,
        query: Vec<(&'static str, String)>,
        format: &'static str,
    ) -> Self {
        Self {
            method: Method::GET,
            path,
            body: RemoteBody::Query(query),
            format,
        }
    }

    /// JSON body, if this is a JSON call.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RemoteBody::Json(v) => Some(v),
            RemoteBody::Query(_) => None,
        }
    }

    /// Value of a query parameter, if this is a query call.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        match &self.body {
            RemoteBody::Query(pairs) => pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str()),
            RemoteBody::Json(_) => None,
        }
    }
}

/// Successful response from the rendering service.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub bytes: Bytes,
    /// `Content-Type` without parameters, if the service sent one.
    pub content_type: Option<String>,
}

/// HTTP client bound to an immutable [`RenderConfig`].
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: Client,
    config: RenderConfig,
}

impl RenderClient {
    pub fn new(config: RenderConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("quickchart-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Perform exactly one request for `call`.
    pub async fn execute(&self, call: &RemoteCall) -> Result<RemoteResponse, ToolError> {
        let url = self.config.url_for(call.path);
        let mut request = self.http.request(call.method.clone(), &url);
        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        request = match &call.body {
            RemoteBody::Json(body) => request.json(body),
            RemoteBody::Query(pairs) => request.query(pairs),
        };

        debug!(method = %call.method, url = %url, "Sending render request");
        let started = Instant::now();
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(url = %url, error = %e, "Failed to read error body");
                    String::new()
                }
            };
            warn!(
                url = %url,
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Render request rejected"
            );
            return Err(ToolError::remote(status.as_u16(), &body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty());
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(
            url = %url,
            bytes = bytes.len(),
            content_type = content_type.as_deref().unwrap_or("-"),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Render request completed"
        );
        Ok(RemoteResponse {
            bytes,
            content_type,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ToolError {
        if e.is_timeout() {
            ToolError::Transport(format!(
                "request timed out after {}s",
                self.config.timeout.as_secs_f64()
            ))
        } else {
            ToolError::from(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_call_accessors() {
        let call = RemoteCall::post_json("/chart", json!({"chart": {"type": "bar"}}), "png");
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.json_body(), Some(&json!({"chart": {"type": "bar"}})));
        assert_eq!(call.query_param("chart"), None);
    }

    #[test]
    fn query_call_accessors() {
        let call = RemoteCall::get_query(
            "/qr",
            vec![("text", "hello".to_string()), ("size", "150".to_string())],
            "png",
        );
        assert_eq!(call.method, Method::GET);
        assert_eq!(call.query_param("size"), Some("150"));
        assert_eq!(call.query_param("missing"), None);
        assert!(call.json_body().is_none());
    }

    #[test]
    fn client_keeps_config() {
        let config = RenderConfig::with_base_url("http://127.0.0.1:1");
        let client = RenderClient::new(config.clone()).expect("client");
        assert_eq!(client.config(), &config);
    }
}
