//! QuickChart MCP Server
//!
//! This binary runs an MCP server that renders charts and graphics through
//! QuickChart, over stdin/stdout (default) or Streamable HTTP.
//!
//! Configuration comes from the environment (`QUICKCHART_BASE_URL`,
//! `QUICKCHART_API_KEY`, `QUICKCHART_TIMEOUT_SECONDS`,
//! `QUICKCHART_MIME_SOURCE`) and is read once at startup.

use clap::{Args, Parser, Subcommand};
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use quickchart_mcp::server::http::GatewayService;
use quickchart_mcp::tool_registry::{search_tools, tools_by_category, ToolCategory};
use quickchart_mcp::{render, QuickChartServer, RenderClient, RenderConfig, ToolKind, ToolRequest};
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::ServiceExt;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_LEVEL_ENV: &str = "MCP_LOG_LEVEL";

#[derive(Parser)]
#[command(name = "quickchart-mcp", version, about = "QuickChart MCP Server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Run the MCP server over Streamable HTTP (SSE)
    ServeHttp(ServeHttpArgs),
    /// Run a single tool call directly and print the outcome as JSON
    Probe(ProbeArgs),
    /// List the available tools, optionally filtered by a keyword search
    Tools(ToolsArgs),
}

#[derive(Args)]
struct ServeHttpArgs {
    /// Bind address (e.g., 127.0.0.1:8000)
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,
    /// SSE keep-alive interval in seconds (0 disables)
    #[arg(long, default_value_t = 15)]
    sse_keep_alive_secs: u64,
    /// Use stateless mode (POST only; no sessions)
    #[arg(long)]
    stateless: bool,
    /// Allowed Origin values (comma-separated). Defaults to localhost only.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "http://localhost,http://127.0.0.1"
    )]
    allow_origin: Vec<String>,
}

#[derive(Args)]
struct ProbeArgs {
    /// Tool to run (render_chart, render_graphviz, render_mermaid, render_qrcode, render_wordcloud)
    #[arg(long)]
    tool: String,
    /// Tool parameters as a JSON object
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Args)]
struct ToolsArgs {
    /// Keywords to match against tool names, descriptions and keywords
    #[arg(long)]
    search: Option<String>,
    /// Maximum number of search results
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_log_filter()))
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(),
        Command::ServeHttp(args) => run_server_http(args),
        Command::Probe(args) => run_probe(args),
        Command::Tools(args) => run_tools(args),
    }
}

/// Filter from `MCP_LOG_LEVEL` (Python-style names accepted), default warn.
fn default_log_filter() -> EnvFilter {
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_default();
    let level = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "error" | "critical" | "fatal" => "error",
        _ => "warn",
    };
    EnvFilter::new(format!("quickchart_mcp={level}"))
}

fn build_client() -> anyhow::Result<Arc<RenderClient>> {
    let config = RenderConfig::from_env()?;
    info!(
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs_f64(),
        api_key = config.api_key.is_some(),
        "Loaded QuickChart configuration"
    );
    Ok(Arc::new(RenderClient::new(config)?))
}

async fn wait_for_shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigquit = signal(SignalKind::quit())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
            _ = sigquit.recv() => {},
            _ = tokio::signal::ctrl_c() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}

fn run_server() -> anyhow::Result<()> {
    info!("Starting QuickChart MCP Server (stdio mode)");
    let client = build_client()?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        info!("MCP server listening on stdio");
        let service = QuickChartServer::new(client).serve(stdio()).await?;
        tokio::select! {
            res = service.waiting() => {
                res?;
                info!("Client disconnected");
            }
            res = wait_for_shutdown_signal() => {
                res?;
                info!("Shutdown signal received");
            }
        }
        Ok::<_, anyhow::Error>(())
    })?;

    info!("Server stopped");
    Ok(())
}

fn run_server_http(args: ServeHttpArgs) -> anyhow::Result<()> {
    info!("Starting QuickChart MCP Server (streamable HTTP mode)");
    let client = build_client()?;

    let bind_addr: SocketAddr = args
        .bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {e}"))?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let session_manager = Arc::new(LocalSessionManager::default());
        let cancel = tokio_util::sync::CancellationToken::new();
        let config = StreamableHttpServerConfig {
            sse_keep_alive: if args.sse_keep_alive_secs == 0 {
                None
            } else {
                Some(Duration::from_secs(args.sse_keep_alive_secs))
            },
            stateful_mode: !args.stateless,
            cancellation_token: cancel.clone(),
            ..Default::default()
        };

        let service = StreamableHttpService::new(
            move || Ok(QuickChartServer::new(client.clone())),
            session_manager,
            config,
        );
        let service = GatewayService::with_origins(service, &args.allow_origin);

        let listener = tokio::net::TcpListener::bind(bind_addr)
            .await
            .map_err(|e| anyhow::anyhow!("bind failed: {e}"))?;
        info!("MCP HTTP server listening on http://{bind_addr}");

        let cancel_for_shutdown = cancel.clone();
        tokio::spawn(async move {
            if wait_for_shutdown_signal().await.is_ok() {
                info!("Shutdown signal received");
                cancel_for_shutdown.cancel();
            }
        });

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("HTTP server shutting down");
                    break;
                }
                res = listener.accept() => {
                    let (stream, _) = res.map_err(|e| anyhow::anyhow!("accept failed: {e}"))?;
                    let svc = service.clone();
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let conn = http1::Builder::new().serve_connection(
                            io,
                            TowerToHyperService::new(svc),
                        );
                        if let Err(err) = conn.await {
                            error!("http connection error: {err}");
                        }
                    });
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    })?;

    info!("Server stopped");
    Ok(())
}

fn run_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let tool: ToolKind = args
        .tool
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown tool: {}", args.tool))?;
    let params = match serde_json::from_str::<Value>(&args.params)? {
        Value::Object(map) => map,
        _ => anyhow::bail!("--params must be a JSON object"),
    };
    let client = build_client()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = rt.block_on(render(&client, ToolRequest::new(tool, params)));
    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);

    if outcome.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{tool} failed"))
    }
}

fn run_tools(args: ToolsArgs) -> anyhow::Result<()> {
    if let Some(query) = args.search.as_deref() {
        let hits = search_tools(query, args.limit);
        if hits.is_empty() {
            anyhow::bail!("no tools match {query:?}");
        }
        for tool in hits {
            println!("{:<18} {}", tool.name, tool.short_desc);
        }
        return Ok(());
    }
    for &cat in ToolCategory::all() {
        println!("{} ({})", cat.as_str(), cat.description());
        for tool in tools_by_category(cat) {
            println!("  {:<18} {}", tool.name, tool.short_desc);
        }
    }
    Ok(())
}
