/// MCP Server Implementation
///
/// This module contains the MCP server that fronts the business assistant:
/// - JSON-RPC 2.0 request/response structures
/// - Tool registry for the assistant's MCP tools
/// - A transport-independent dispatcher shared by HTTP and STDIO
/// - HTTP server setup with Actix Web
/// - STDIO server implementation for line-based communication

use actix_web::{
    web, App, HttpRequest, HttpServer, HttpResponse, Result,
    middleware::{Compress, Logger, DefaultHeaders},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::catalog::ToolCatalog;
use crate::core::utils::ServerConfig;
use crate::router::QueryRouter;
use crate::session::{Session, SessionStore};
use crate::tools;

/// MCP protocol revision implemented by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP header carrying the client's session key
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Session key for HTTP requests without a session header
pub const DEFAULT_HTTP_SESSION: &str = "http";

/// Session key used by the STDIO transport
pub const STDIO_SESSION: &str = "stdio";

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

/// Application state shared by both transports.
///
/// The router and catalog are read-only; everything a client mutates lives
/// in its own session inside the store.
#[derive(Clone)]
pub struct AppState {
    /// Server name as reported in MCP initialize responses
    pub server_name: String,
    /// Server version string as reported in MCP initialize responses
    pub server_version: String,
    pub router: Arc<QueryRouter>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        catalog: ToolCatalog,
        sessions: SessionStore,
    ) -> Self {
        Self {
            server_name: name.into(),
            server_version: version.into(),
            router: Arc::new(QueryRouter::new(Arc::new(catalog))),
            sessions: Arc::new(sessions),
        }
    }
}

/// JSON-RPC 2.0 request structure for MCP protocol.
///
/// `id` is None for notifications, which never receive a response.
#[derive(Deserialize, Debug)]
pub struct MCPRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    /// MCP method name (e.g., "initialize", "tools/list", "tools/call")
    method: String,
    params: Option<Value>,
}

/// JSON-RPC 2.0 response structure for MCP protocol.
#[derive(Serialize, Deserialize, Debug)]
pub struct MCPResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MCPError>,
}

impl MCPResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(MCPError {
                code,
                message,
                data: None,
            }),
        }
    }
}

/// JSON-RPC 2.0 error structure.
#[derive(Serialize, Deserialize, Debug)]
pub struct MCPError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// MCP tool definition, serialized for tools/list
#[derive(Serialize, Debug, Clone)]
pub struct MCPTool {
    pub name: String,
    pub description: String,
    /// JSON Schema defining the tool's input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// What a tool handler sees while it runs: the shared router and the
/// calling client's session, locked for the duration of the call.
pub struct ToolContext<'a> {
    pub router: &'a QueryRouter,
    pub session: &'a mut Session,
}

impl ToolContext<'_> {
    pub fn catalog(&self) -> &ToolCatalog {
        self.router.catalog()
    }
}

/// Tool handler function type definition.
///
/// A string result is sent as-is; any other JSON value is serialized into
/// the text content.
pub type ToolHandler =
    Box<dyn Fn(&mut ToolContext<'_>, Value) -> std::result::Result<Value, String> + Send + Sync>;

/// Registry of available MCP tools.
pub struct ToolRegistry {
    /// List of all registered tools (for tools/list method)
    pub tools: Vec<MCPTool>,
    /// Map of tool names to their handler functions (for tools/call method)
    pub handlers: HashMap<String, ToolHandler>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: MCPTool, handler: ToolHandler) {
        let name = tool.name.clone();
        self.tools.push(tool);
        self.handlers.insert(name, handler);
    }
}

/// Initialize and register all tools.
pub fn initialize_tools() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    tools::register_all(&mut registry);
    Arc::new(registry)
}

/// Route one JSON-RPC request to its method handler.
///
/// `tools/call` runs the tool handler against the named session while the
/// session store lock is held; every other method is stateless.
///
/// # Arguments
/// * `state` - Shared router and session store
/// * `registry` - Registered MCP tools and their handlers
/// * `session_key` - Session the request belongs to (`stdio`, `http` or a client id)
/// * `req` - Parsed JSON-RPC request
///
/// # Returns
/// The response to send, or None for notifications
pub fn dispatch(
    state: &AppState,
    registry: &ToolRegistry,
    session_key: &str,
    req: MCPRequest,
) -> Option<MCPResponse> {
    if req.id.is_none() {
        tracing::debug!(method = %req.method, "Notification received");
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(state, req.id),
        "ping" => MCPResponse::success(req.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(registry, req.id),
        "tools/call" => handle_tools_call(state, registry, session_key, req.id, req.params),
        _ => MCPResponse::failure(
            req.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };
    Some(response)
}

/// Handle MCP initialize method.
fn handle_initialize(state: &AppState, id: Option<Value>) -> MCPResponse {
    MCPResponse::success(
        id,
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": state.server_name,
                "version": state.server_version
            }
        }),
    )
}

fn handle_tools_list(registry: &ToolRegistry, id: Option<Value>) -> MCPResponse {
    MCPResponse::success(id, serde_json::json!({ "tools": registry.tools }))
}

/// Handle MCP tools/call method.
///
/// Tool failures are reported inside the result with `isError: true`;
/// protocol errors (missing params, unknown MCP tool) use the JSON-RPC
/// error object.
fn handle_tools_call(
    state: &AppState,
    registry: &ToolRegistry,
    session_key: &str,
    id: Option<Value>,
    params: Option<Value>,
) -> MCPResponse {
    let Some(tool_params) = params else {
        return MCPResponse::failure(id, INVALID_PARAMS, "Invalid params".to_string());
    };

    let tool_name = tool_params
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let arguments = tool_params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    let Some(handler) = registry.handlers.get(tool_name) else {
        tracing::warn!(tool = tool_name, "Unknown MCP tool");
        return MCPResponse::failure(id, METHOD_NOT_FOUND, format!("Unknown tool: {}", tool_name));
    };

    tracing::info!(tool = tool_name, session = session_key, "Calling tool");
    let outcome = state.sessions.with_session(session_key, |session| {
        let mut ctx = ToolContext {
            router: &state.router,
            session,
        };
        handler(&mut ctx, arguments)
    });

    match outcome {
        Ok(result) => {
            let text = match result {
                Value::String(text) => text,
                other => serde_json::to_string(&other).unwrap_or_default(),
            };
            MCPResponse::success(
                id,
                serde_json::json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false
                }),
            )
        }
        Err(e) => {
            tracing::warn!(tool = tool_name, error = %e, "Tool call failed");
            MCPResponse::success(
                id,
                serde_json::json!({
                    "content": [{ "type": "text", "text": format!("Error: {}", e) }],
                    "isError": true
                }),
            )
        }
    }
}

/// Health check endpoint handler.
async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "mcp-business-assistant"
    })))
}

/// MCP JSON-RPC request handler for HTTP mode.
///
/// The client's session is chosen by the `Mcp-Session-Id` header.
/// Notifications are acknowledged with 202 and no body.
async fn mcp_handler(
    state: web::Data<AppState>,
    registry: web::Data<Arc<ToolRegistry>>,
    counter: web::Data<AtomicU64>,
    http_req: HttpRequest,
    req: web::Json<MCPRequest>,
) -> Result<HttpResponse> {
    counter.fetch_add(1, Ordering::Relaxed);

    let session_key = http_req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_HTTP_SESSION)
        .to_string();

    match dispatch(&state, &registry, &session_key, req.into_inner()) {
        Some(response) => Ok(HttpResponse::Ok().json(response)),
        None => Ok(HttpResponse::Accepted().finish()),
    }
}

/// Metrics endpoint handler for monitoring.
async fn metrics_handler(
    state: web::Data<AppState>,
    counter: web::Data<AtomicU64>,
) -> Result<HttpResponse> {
    let count = counter.load(Ordering::Relaxed);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "requests_total": count,
        "sessions": state.sessions.len(),
        "status": "ok"
    })))
}

/// Server-Sent Events endpoint for tools discovery.
async fn sse_tools_discovery(registry: web::Data<Arc<ToolRegistry>>) -> Result<HttpResponse> {
    use actix_web::http::header;

    let tools_data = serde_json::json!({
        "tools": registry.tools,
        "count": registry.tools.len()
    });

    // SSE event framing: "data: {json}\n\n"
    let sse_data = format!(
        "data: {}\n\n",
        serde_json::to_string(&tools_data).unwrap_or_else(|_| "{}".to_string())
    );

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(header::CacheControl(vec![
            header::CacheDirective::NoCache,
            header::CacheDirective::NoStore,
            header::CacheDirective::MustRevalidate,
        ]))
        // Disable nginx buffering for real-time streaming
        .insert_header(("x-accel-buffering", "no"))
        .body(sse_data))
}

/// Register HTTP routes. Expects `AppState`, `Arc<ToolRegistry>` and the
/// `AtomicU64` request counter as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics_handler))
        .route("/sse", web::get().to(sse_tools_discovery))
        .route("/mcp", web::post().to(mcp_handler))
        .route("/", web::post().to(mcp_handler))
        .route("/", web::get().to(health));
}

/// Run the MCP server in HTTP mode.
///
/// The server is configured with:
/// - Worker threads: from config, else CPU count (max 16)
/// - Max connections: 10,000 concurrent connections
/// - Connection rate limit: 1,000 connections per second
/// - Keep-alive and request timeout: 30 seconds
/// - Shutdown timeout: 10 seconds
pub async fn run_server_http(
    config: &ServerConfig,
    state: AppState,
    registry: Arc<ToolRegistry>,
) -> std::io::Result<()> {
    let bind_addr = config.bind_addr();
    let workers = config.worker_count();

    let app_state = web::Data::new(state);
    let tool_registry = web::Data::new(registry);
    let request_count = web::Data::new(AtomicU64::new(0));

    tracing::info!(
        name = %app_state.server_name,
        version = %app_state.server_version,
        bind = %bind_addr,
        workers,
        "MCP server starting (HTTP mode)"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(tool_registry.clone())
            .app_data(request_count.clone())
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            // %r = request line, %s = status, %Dms = duration in milliseconds
            .wrap(Logger::new("%r %s %Dms"))
            .configure(configure)
    })
    .workers(workers)
    .max_connections(10000)
    .max_connection_rate(1000)
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_secs(30))
    .client_disconnect_timeout(Duration::from_secs(2))
    .shutdown_timeout(10)
    .bind(&bind_addr)?
    .run()
    .await
}

/// Run the MCP server in STDIO mode.
///
/// Reads JSON-RPC requests line-by-line from stdin and writes responses to
/// stdout. All logging goes to stderr.
pub async fn run_server_stdio(state: AppState, registry: Arc<ToolRegistry>) -> std::io::Result<()> {
    tracing::info!(
        name = %state.server_name,
        version = %state.server_version,
        "MCP server starting (STDIO mode)"
    );

    let stdin = BufReader::with_capacity(8192, tokio::io::stdin());
    let stdout = BufWriter::with_capacity(8192, tokio::io::stdout());
    serve_lines(&state, &registry, stdin, stdout).await
}

/// Serve newline-delimited JSON-RPC from `reader`, one response line per
/// request written to `writer`. All requests share the STDIO session.
///
/// Blank lines are skipped. A line that is not valid JSON-RPC gets a -32700
/// response only when its `id` can still be recovered. Notifications produce
/// no output.
///
/// # Arguments
/// * `state` - Shared router and session store
/// * `registry` - Registered MCP tools and their handlers
/// * `reader` - Request stream (stdin in production)
/// * `writer` - Response stream (stdout in production), flushed after each line
///
/// # Returns
/// Ok when `reader` reaches end of input, or the first I/O error
pub async fn serve_lines<R, W>(
    state: &AppState,
    registry: &ToolRegistry,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<MCPRequest>(&line) {
            Ok(req) => dispatch(state, registry, STDIO_SESSION, req),
            Err(e) => {
                tracing::warn!(error = %e, "Parse error");
                // Only answer if an id can be recovered from the payload
                serde_json::from_str::<Value>(&line)
                    .ok()
                    .and_then(|partial| partial.get("id").cloned())
                    .map(|id| MCPResponse::failure(Some(id), PARSE_ERROR, format!("Parse error: {}", e)))
            }
        };

        let Some(response) = response else {
            continue;
        };

        let response_json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Error serializing response");
                continue;
            }
        };

        // Each response must be on a single line followed by newline
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
