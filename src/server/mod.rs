//! MCP server exposing the QuickChart rendering tools.

pub mod http;

use crate::client::RenderClient;
use crate::tool_registry;
use crate::tools::{
    self, ChartRequest, GraphvizRequest, MermaidRequest, QrCodeRequest, ToolKind, ToolRequest,
    WordCloudRequest,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// MCP server for QuickChart rendering
#[derive(Clone)]
pub struct QuickChartServer {
    client: Arc<RenderClient>,
    tool_mux: ToolMux<QuickChartServer>,
}

#[derive(Clone)]
struct ToolMux<S> {
    call_router: ToolRouter<S>,
}

impl<S> ToolMux<S>
where
    S: Send + Sync + 'static,
{
    fn new(call_router: ToolRouter<S>) -> Self {
        Self { call_router }
    }

    async fn call(
        &self,
        context: ToolCallContext<'_, S>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.call_router.call(context).await
    }

    /// Tools in registry order.
    fn list_all(&self) -> Vec<Tool> {
        let mut tools = Vec::new();
        for info in tool_registry::all_tools() {
            if let Some(route) = self.call_router.map.get(info.name) {
                tools.push(route.attr.clone());
            }
        }
        tools
    }
}

impl QuickChartServer {
    pub fn new(client: Arc<RenderClient>) -> Self {
        info!(base_url = %client.config().base_url, "Creating QuickChart MCP server");
        let call_router = Self::tool_router();
        Self {
            client,
            tool_mux: ToolMux::new(call_router),
        }
    }

    /// Names of the tools this server lists, in order.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_mux
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }

    fn instructions(&self) -> String {
        let mut lines = vec![
            "Render charts, diagrams, QR codes and word clouds through QuickChart.".to_string(),
            "Each tool returns the image inline (MCP image content plus a base64 data URI); nothing is written to disk.".to_string(),
            String::new(),
            "Tools:".to_string(),
        ];
        for info in tool_registry::all_tools() {
            lines.push(format!("- {}: {}", info.name, info.short_desc));
        }
        lines.push(String::new());
        lines.push(
            "Failures are returned as tool errors starting with ❌ and name the failing stage \
             (validation, remote service or transport)."
                .to_string(),
        );
        lines.join("\n")
    }

    async fn dispatch<T: Serialize>(&self, tool: ToolKind, typed: &T) -> CallToolResult {
        debug!("Tool call: {}", tool.name());
        let request = ToolRequest::from_typed(tool, typed);
        tools::render(&self.client, request).await.into_call_result()
    }
}

#[tool_router]
impl QuickChartServer {
    #[tool(
        description = "Render a chart from a Chart.js configuration. \
        `config` is required (JSON object or JSON string). Optional: width, height (pixels), \
        format (png, webp, jpg, jpeg, svg, pdf; default png), background color. \
        Returns the image inline as base64 with a data URI."
    )]
    #[instrument(skip_all)]
    async fn render_chart(
        &self,
        Parameters(req): Parameters<ChartRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolKind::Chart, &req).await)
    }

    #[tool(
        description = "Render a Graphviz diagram from DOT source. `graph` is required. \
        Optional: layout (dot, neato, fdp, sfdp, circo, twopi, osage, patchwork), \
        format (png, svg, jpg, jpeg; default png)."
    )]
    #[instrument(skip_all)]
    async fn render_graphviz(
        &self,
        Parameters(req): Parameters<GraphvizRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolKind::Graphviz, &req).await)
    }

    #[tool(
        description = "Render a Mermaid diagram. `mermaid` is required. \
        Optional: theme (default, neutral, dark, forest, base), format (png or svg; default png)."
    )]
    #[instrument(skip_all)]
    async fn render_mermaid(
        &self,
        Parameters(req): Parameters<MermaidRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolKind::Mermaid, &req).await)
    }

    #[tool(
        description = "Generate a QR code. `text` is required. \
        Optional: size (pixels), correction level (L, M, Q, H), format (png or svg; default png)."
    )]
    #[instrument(skip_all)]
    async fn render_qrcode(
        &self,
        Parameters(req): Parameters<QrCodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolKind::QrCode, &req).await)
    }

    #[tool(
        description = "Generate a word cloud. `words` is required: weighted words as JSON \
        (e.g. {\"rust\": 10, \"mcp\": 4}). Optional: width, height (pixels), \
        format (png, svg, jpg, jpeg; default png)."
    )]
    #[instrument(skip_all)]
    async fn render_wordcloud(
        &self,
        Parameters(req): Parameters<WordCloudRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(ToolKind::WordCloud, &req).await)
    }
}

#[tool_handler(router = self.tool_mux)]
impl ServerHandler for QuickChartServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;

    fn server() -> QuickChartServer {
        let client = RenderClient::new(RenderConfig::with_base_url("http://127.0.0.1:9"))
            .expect("client");
        QuickChartServer::new(Arc::new(client))
    }

    #[test]
    fn lists_tools_in_registry_order() {
        let names = server().tool_names();
        let expected: Vec<String> = tool_registry::all_tools()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn info_enables_tools_and_mentions_each() {
        let server = server();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        let instructions = info.instructions.expect("instructions");
        for kind in ToolKind::ALL {
            assert!(instructions.contains(kind.name()));
        }
    }

    #[tokio::test]
    async fn validation_failures_become_tool_errors() {
        let result = server()
            .dispatch(ToolKind::Mermaid, &MermaidRequest::default())
            .await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn non_string_arguments_reach_validation() {
        let req: QrCodeRequest =
            serde_json::from_value(serde_json::json!({"text": 12345, "format": 7}))
                .expect("loose arguments deserialize");
        let result = server().dispatch(ToolKind::QrCode, &req).await;
        assert_eq!(result.is_error, Some(true));
        let rendered = serde_json::to_string(&result).expect("serialize");
        assert!(rendered.contains("Validation error: format must be one of: png, svg."));
    }

    #[test]
    fn every_request_type_accepts_numbers_for_text_fields() {
        let loose = serde_json::json!({
            "graph": 1, "layout": 2, "mermaid": 3, "theme": 4,
            "text": 5, "correction": 6, "format": 7, "background": 8
        });
        serde_json::from_value::<ChartRequest>(loose.clone()).expect("chart");
        serde_json::from_value::<GraphvizRequest>(loose.clone()).expect("graphviz");
        serde_json::from_value::<MermaidRequest>(loose.clone()).expect("mermaid");
        serde_json::from_value::<QrCodeRequest>(loose.clone()).expect("qrcode");
        serde_json::from_value::<WordCloudRequest>(loose).expect("wordcloud");
    }
}
