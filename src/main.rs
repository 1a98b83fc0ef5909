/// MCP Business Assistant Entry Point
///
/// Loads configuration (optional `kmcp.yaml` plus environment variables),
/// builds the tool catalog and starts the MCP server on the configured
/// transport.
///
/// Environment Variables:
/// - SERVER_NAME: Name of the server (default: "mcp-business-assistant")
/// - SERVER_VERSION: Version string (default: crate version)
/// - MCP_TRANSPORT_MODE: "stdio", "http", or "both" (default: "both")
/// - HOST: Bind address for HTTP mode (default: "0.0.0.0")
/// - PORT: Port number for HTTP mode (default: 3000)
/// - WORKER_THREADS: HTTP worker count (default: CPU count, max 16)
/// - MCP_CONFIG: Path to the YAML config file (default: "kmcp.yaml" if present)
/// - MCP_HISTORY_LIMIT: Query log entries kept per session
/// - MCP_MAX_SESSIONS: Sessions held at once before the least recently used is dropped (default: 1024)
/// - MCP_DATA_FILE: YAML file overriding the mock tool data
/// - RUST_LOG: Log filter (default: "info"); logs go to stderr

use business_assistant::{SessionStore, ToolCatalog};
use business_assistant::core::server::{self, AppState};
use business_assistant::core::utils::{self, Config, TransportMode};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // stdout carries JSON-RPC in STDIO mode, so logs must go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(utils::get_env_var("RUST_LOG", "info")))
        .with_writer(std::io::stderr)
        .init();
}

fn build_state(config: &Config) -> business_assistant::Result<AppState> {
    let catalog = match &config.data_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading mock data overrides");
            ToolCatalog::from_data_file(path)?
        }
        None => ToolCatalog::new(),
    };
    let mut sessions = SessionStore::new(config.history_limit);
    if let Some(max) = config.max_sessions {
        sessions = sessions.with_max_sessions(max);
    }
    Ok(AppState::new(
        config.server.name.clone(),
        config.server.version.clone(),
        catalog,
        sessions,
    ))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = match utils::load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build tool catalog");
            std::process::exit(1);
        }
    };
    let registry = server::initialize_tools();

    match config.server.transport {
        TransportMode::Stdio => server::run_server_stdio(state, registry).await,
        TransportMode::Http => server::run_server_http(&config.server, state, registry).await,
        TransportMode::Both => {
            // STDIO in the background for MCP Inspector, HTTP in the foreground
            let stdio_state = state.clone();
            let stdio_registry = registry.clone();
            let stdio_handle = tokio::spawn(async move {
                if let Err(e) = server::run_server_stdio(stdio_state, stdio_registry).await {
                    tracing::error!(error = %e, "STDIO server error");
                }
            });

            let http_result = server::run_server_http(&config.server, state, registry).await;
            stdio_handle.abort();
            http_result
        }
    }
}
