//! Error types for the QuickChart MCP server.
//!
//! Tool failures are never surfaced as protocol errors. Every `ToolError` is
//! translated into a `CallToolResult` with `is_error: true`, while protocol
//! errors (unknown tool, malformed arguments) are handled by rmcp.

use thiserror::Error;

/// Longest remote error body echoed back to the caller.
const MAX_REMOTE_BODY_CHARS: usize = 512;

/// Failures raised while validating, forwarding or decoding a tool call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Bad or missing input. Raised before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The rendering service answered with a non-2xx status.
    #[error("Remote service error: HTTP {status}{}", body_suffix(.body))]
    RemoteService { status: u16, body: Option<String> },

    /// The rendering service answered 2xx with no bytes.
    #[error("Remote service error: empty payload")]
    EmptyPayload,

    /// DNS, connect, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Which stage of the pipeline produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    Validation,
    Remote,
    Transport,
}

impl ErrorStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Remote => "remote",
            Self::Transport => "transport",
        }
    }
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    /// Build a remote error, trimming and truncating the response body.
    pub fn remote(status: u16, body: &str) -> Self {
        let trimmed = body.trim();
        let body = if trimmed.is_empty() {
            None
        } else if trimmed.chars().count() > MAX_REMOTE_BODY_CHARS {
            let cut: String = trimmed.chars().take(MAX_REMOTE_BODY_CHARS).collect();
            Some(format!("{cut}..."))
        } else {
            Some(trimmed.to_string())
        };
        ToolError::RemoteService { status, body }
    }

    pub fn stage(&self) -> ErrorStage {
        match self {
            Self::Validation(_) => ErrorStage::Validation,
            Self::RemoteService { .. } | Self::EmptyPayload => ErrorStage::Remote,
            Self::Transport(_) => ErrorStage::Transport,
        }
    }

    /// HTTP status for remote failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteService { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(text) => format!(": {text}"),
        None => String::new(),
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(e: reqwest::Error) -> Self {
        ToolError::Transport(describe_transport_error(&e))
    }
}

/// Describe a reqwest failure by its innermost cause.
///
/// reqwest's own `Display` only says "error sending request for url (...)",
/// which hides whether DNS, connect or TLS failed.
fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        return "request timed out".to_string();
    }
    let mut cause: &dyn std::error::Error = e;
    while let Some(next) = cause.source() {
        cause = next;
    }
    let root = cause.to_string();
    let outer = e.to_string();
    if e.is_connect() {
        format!("connection failed: {root}")
    } else if root == outer {
        outer
    } else {
        format!("{outer}: {root}")
    }
}
