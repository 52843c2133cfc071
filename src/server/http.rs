//! Front door for the Streamable HTTP transport.

use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::http::{
    header::{CONTENT_TYPE, ORIGIN},
    Method, Request, Response, StatusCode,
};
use serde_json::json;
use std::collections::HashSet;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower_service::Service;

pub type GatewayBody = BoxBody<Bytes, Infallible>;

pub const HEALTH_PATH: &str = "/health";
const SERVICE_NAME: &str = "quickchart_mcp";

/// Answers `GET /health` itself, rejects requests whose `Origin` is not
/// allow-listed, and hands everything else to the MCP service.
#[derive(Clone)]
pub struct GatewayService<S> {
    inner: S,
    allowed_origins: Arc<HashSet<String>>,
}

impl<S> GatewayService<S> {
    pub fn new(inner: S, allowed_origins: Arc<HashSet<String>>) -> Self {
        Self {
            inner,
            allowed_origins,
        }
    }

    /// Build from raw `--allow-origin` values; blanks are dropped.
    pub fn with_origins<I>(inner: S, origins: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let allowed: HashSet<String> = origins
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self::new(inner, Arc::new(allowed))
    }
}

fn plain_response(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<GatewayBody> {
    let mut resp = Response::new(Full::new(body.into()).boxed());
    *resp.status_mut() = status;
    if let Ok(value) = content_type.parse() {
        resp.headers_mut().insert(CONTENT_TYPE, value);
    }
    resp
}

fn health_response() -> Response<GatewayBody> {
    let body = json!({"status": "ok", "service": SERVICE_NAME}).to_string();
    plain_response(StatusCode::OK, "application/json", body)
}

impl<B, S> Service<Request<B>> for GatewayService<S>
where
    B: http_body::Body + Send + 'static,
    B::Error: std::fmt::Display,
    S: Service<Request<B>, Response = Response<GatewayBody>, Error = Infallible>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<GatewayBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let allowed_origins = self.allowed_origins.clone();
        let mut inner = self.inner.clone();
        Box::pin(async move {
            if req.method() == Method::GET && req.uri().path() == HEALTH_PATH {
                return Ok(health_response());
            }
            if let Some(origin) = req.headers().get(ORIGIN).and_then(|v| v.to_str().ok()) {
                if !allowed_origins.contains(origin) {
                    tracing::debug!(origin, "Rejected request from disallowed origin");
                    return Ok(plain_response(
                        StatusCode::FORBIDDEN,
                        "text/plain",
                        "Forbidden",
                    ));
                }
            }
            inner.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Echo {
        hits: Arc<AtomicUsize>,
    }

    impl Service<Request<Full<Bytes>>> for Echo {
        type Response = Response<GatewayBody>;
        type Error = Infallible;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: Request<Full<Bytes>>) -> Self::Future {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(plain_response(StatusCode::OK, "text/plain", "mcp")) })
        }
    }

    fn gateway(inner: Echo) -> GatewayService<Echo> {
        GatewayService::with_origins(inner, ["http://localhost", " ", "http://127.0.0.1"])
    }

    fn request(method: Method, path: &str, origin: Option<&str>) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(origin) = origin {
            builder = builder.header(ORIGIN, origin);
        }
        builder.body(Full::new(Bytes::new())).expect("request")
    }

    async fn body_bytes(resp: Response<GatewayBody>) -> Bytes {
        resp.into_body().collect().await.expect("body").to_bytes()
    }

    #[tokio::test]
    async fn health_answers_without_touching_mcp() {
        let inner = Echo::default();
        let resp = gateway(inner.clone())
            .call(request(Method::GET, "/health", Some("http://evil.example")))
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        let body: Value = serde_json::from_slice(&body_bytes(resp).await).expect("json");
        assert_eq!(body, json!({"status": "ok", "service": "quickchart_mcp"}));
        assert_eq!(inner.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn disallowed_origin_is_forbidden() {
        let inner = Echo::default();
        let resp = gateway(inner.clone())
            .call(request(Method::POST, "/mcp", Some("http://evil.example")))
            .await
            .expect("infallible");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(&body_bytes(resp).await[..], b"Forbidden");
        assert_eq!(inner.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn allowed_or_missing_origin_passes_through() {
        let inner = Echo::default();
        let mut svc = gateway(inner.clone());
        for origin in [Some("http://localhost"), None] {
            let resp = svc
                .call(request(Method::POST, "/mcp", origin))
                .await
                .expect("infallible");
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(&body_bytes(resp).await[..], b"mcp");
        }
        assert_eq!(inner.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn post_to_health_path_goes_to_mcp() {
        let inner = Echo::default();
        let resp = gateway(inner.clone())
            .call(request(Method::POST, "/health", None))
            .await
            .expect("infallible");
        assert_eq!(&body_bytes(resp).await[..], b"mcp");
        assert_eq!(inner.hits.load(Ordering::SeqCst), 1);
    }
}
