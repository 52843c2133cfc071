//! Tool façades and the shared validate → call → encode pipeline.
//!
//! Every tool is a [`ToolKind`] with a parameter schema, a fixed remote path
//! and a function that maps validated parameters to a [`RemoteCall`].
//! [`render`] runs the pipeline and always returns a [`ToolOutcome`]; errors
//! never escape as faults.

pub mod chart;
pub mod graphviz;
pub mod mermaid;
pub mod qrcode;
pub mod wordcloud;

pub use chart::ChartRequest;
pub use graphviz::GraphvizRequest;
pub use mermaid::MermaidRequest;
pub use qrcode::QrCodeRequest;
pub use wordcloud::WordCloudRequest;

use crate::client::{RemoteCall, RenderClient};
use crate::config::MimeSource;
use crate::error::{ErrorStage, ToolError};
use crate::schema::{self, ParamSpec, ValidatedParams};
use base64::Engine;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Output format used when the caller does not pick one.
pub const DEFAULT_FORMAT: &str = "png";

/// The five rendering operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Chart,
    Graphviz,
    Mermaid,
    QrCode,
    WordCloud,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        Self::Chart,
        Self::Graphviz,
        Self::Mermaid,
        Self::QrCode,
        Self::WordCloud,
    ];

    /// MCP tool name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chart => "render_chart",
            Self::Graphviz => "render_graphviz",
            Self::Mermaid => "render_mermaid",
            Self::QrCode => "render_qrcode",
            Self::WordCloud => "render_wordcloud",
        }
    }

    /// Short noun used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Graphviz => "Graphviz diagram",
            Self::Mermaid => "Mermaid diagram",
            Self::QrCode => "QR code",
            Self::WordCloud => "word cloud",
        }
    }

    pub fn remote_path(&self) -> &'static str {
        match self {
            Self::Chart => chart::PATH,
            Self::Graphviz => graphviz::PATH,
            Self::Mermaid => mermaid::PATH,
            Self::QrCode => qrcode::PATH,
            Self::WordCloud => wordcloud::PATH,
        }
    }

    pub fn params(&self) -> &'static [ParamSpec] {
        match self {
            Self::Chart => chart::PARAMS,
            Self::Graphviz => graphviz::PARAMS,
            Self::Mermaid => mermaid::PARAMS,
            Self::QrCode => qrcode::PARAMS,
            Self::WordCloud => wordcloud::PARAMS,
        }
    }

    pub fn build_call(&self, params: &ValidatedParams) -> RemoteCall {
        match self {
            Self::Chart => chart::build_call(params),
            Self::Graphviz => graphviz::build_call(params),
            Self::Mermaid => mermaid::build_call(params),
            Self::QrCode => qrcode::build_call(params),
            Self::WordCloud => wordcloud::build_call(params),
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::Chart => "Chart rendered via QuickChart.",
            Self::Graphviz => "Graphviz diagram rendered via QuickChart.",
            Self::Mermaid => "Mermaid diagram rendered via QuickChart.",
            Self::QrCode => "QR code generated via QuickChart.",
            Self::WordCloud => "Word cloud generated via QuickChart.",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ();

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase().replace(['-', ' '], "_");
        let bare = normalized.strip_prefix("render_").unwrap_or(&normalized);
        match bare {
            "chart" => Ok(Self::Chart),
            "graphviz" | "dot" => Ok(Self::Graphviz),
            "mermaid" => Ok(Self::Mermaid),
            "qrcode" | "qr" | "qr_code" => Ok(Self::QrCode),
            "wordcloud" | "word_cloud" => Ok(Self::WordCloud),
            _ => Err(()),
        }
    }
}

/// A tool invocation: which tool plus its raw named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub tool: ToolKind,
    pub params: Map<String, Value>,
}

impl ToolRequest {
    pub fn new(tool: ToolKind, params: Map<String, Value>) -> Self {
        Self { tool, params }
    }

    /// Build from a typed request struct.
    pub fn from_typed<T: Serialize>(tool: ToolKind, typed: &T) -> Self {
        let params = match serde_json::to_value(typed) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self { tool, params }
    }
}

/// Successfully rendered image, base64-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub tool: ToolKind,
    pub mime_type: String,
    pub base64: String,
    pub byte_len: usize,
}

impl RenderedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.base64)
    }
}

/// Result of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(RenderedImage),
    Failure { stage: ErrorStage, message: String },
}

impl ToolOutcome {
    fn failure(tool: ToolKind, err: &ToolError) -> Self {
        ToolOutcome::Failure {
            stage: err.stage(),
            message: format!("❌ Failed to render {}. {err}", tool.label()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Human-readable text block for this outcome.
    pub fn text(&self) -> String {
        match self {
            Self::Success(image) => format!(
                "✅ {summary}\n- MIME type: {mime}\n- Size: {len} bytes\n- Data URI: {uri}",
                summary = image.tool.summary(),
                mime = image.mime_type,
                len = image.byte_len,
                uri = image.data_uri(),
            ),
            Self::Failure { message, .. } => message.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(image) => json!({
                "success": true,
                "tool": image.tool.name(),
                "mime_type": image.mime_type,
                "bytes": image.byte_len,
                "base64": image.base64,
            }),
            Self::Failure { stage, message } => json!({
                "success": false,
                "stage": stage.as_str(),
                "message": message,
            }),
        }
    }

    /// Convert to an MCP result. Failures set `is_error: true`.
    pub fn into_call_result(self) -> CallToolResult {
        let text = self.text();
        match self {
            Self::Success(image) => CallToolResult::success(vec![
                Content::image(image.base64, image.mime_type),
                Content::text(text),
            ]),
            Self::Failure { .. } => CallToolResult::error(vec![Content::text(text)]),
        }
    }
}

/// Mime type for a requested output format.
pub fn mime_for_format(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Pick the mime type for a rendered payload.
pub fn resolve_mime(source: MimeSource, content_type: Option<&str>, format: &str) -> String {
    match (source, content_type) {
        (MimeSource::Response, Some(ct)) if is_specific_mime(ct) => ct.to_string(),
        _ => mime_for_format(format).to_string(),
    }
}

fn is_specific_mime(content_type: &str) -> bool {
    content_type.contains('/')
        && !matches!(
            content_type,
            "application/octet-stream" | "binary/octet-stream"
        )
}

/// Run one tool call end to end.
pub async fn render(client: &RenderClient, request: ToolRequest) -> ToolOutcome {
    let tool = request.tool;
    match run(client, &request).await {
        Ok(image) => {
            debug!(tool = tool.name(), bytes = image.byte_len, mime = %image.mime_type, "Tool call succeeded");
            ToolOutcome::Success(image)
        }
        Err(err) => {
            warn!(tool = tool.name(), stage = err.stage().as_str(), error = %err, "Tool call failed");
            ToolOutcome::failure(tool, &err)
        }
    }
}

async fn run(client: &RenderClient, request: &ToolRequest) -> Result<RenderedImage, ToolError> {
    let tool = request.tool;
    let params = schema::validate(tool.params(), &request.params)?;
    let call = tool.build_call(&params);
    let response = client.execute(&call).await?;
    if response.bytes.is_empty() {
        return Err(ToolError::EmptyPayload);
    }
    let mime_type = resolve_mime(
        client.config().mime_source,
        response.content_type.as_deref(),
        call.format,
    );
    Ok(RenderedImage {
        tool,
        mime_type,
        base64: base64::engine::general_purpose::STANDARD.encode(&response.bytes),
        byte_len: response.bytes.len(),
    })
}

/// Optional trimmed text parameter.
fn trimmed<'a>(params: &'a ValidatedParams, name: &str) -> Option<&'a str> {
    params
        .text(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
