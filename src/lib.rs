//! QuickChart MCP Server
//!
//! This library exposes a fixed set of QuickChart rendering operations as MCP
//! (Model Context Protocol) tools. Each tool validates its parameters,
//! forwards one HTTP request to the QuickChart service and returns the
//! rendered image inline as base64 (MCP image content plus a `data:` URI).
//!
//! # Architecture
//!
//! - **RenderConfig** (`config`): immutable settings read once from the
//!   environment (base URL, API key, timeout, mime policy).
//!
//! - **RenderClient** (`client`): the Request Adapter. Performs exactly one
//!   outbound call per tool invocation and maps failures to
//!   `RemoteService` or `Transport` errors. No retries, no caching.
//!
//! - **Tool façades** (`tools`): one per operation. Each declares a parameter
//!   schema (`schema`), maps validated parameters to a `RemoteCall`, and
//!   turns the response into a `ToolOutcome`.
//!
//! - **QuickChartServer** (`server`): the rmcp `ServerHandler`. Stateless
//!   apart from the shared read-only client, so tool calls run concurrently.
//!
//! # Tools
//!
//! - `render_chart`: Chart.js config → `POST /chart`
//! - `render_graphviz`: DOT source → `POST /graphviz`
//! - `render_mermaid`: Mermaid source → `POST /mermaid`
//! - `render_qrcode`: text → `GET /qr`
//! - `render_wordcloud`: weighted words → `POST /wordcloud`

pub mod client;
pub mod config;
pub mod error;
pub mod schema;
pub mod server;
pub mod tool_registry;
pub mod tools;

pub use client::{RemoteBody, RemoteCall, RemoteResponse, RenderClient};
pub use config::{ConfigError, MimeSource, RenderConfig};
pub use error::{ErrorStage, ToolError};
pub use server::QuickChartServer;
pub use tool_registry::{ToolCategory, ToolInfo, TOOL_REGISTRY};
pub use tools::{render, RenderedImage, ToolKind, ToolOutcome, ToolRequest};
