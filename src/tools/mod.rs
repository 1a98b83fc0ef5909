/// Tools Module
///
/// MCP tools exposed by the assistant. Each module exports a `register`
/// function that adds its tools to the registry during server startup.

pub mod ask;
pub mod connections;
pub mod dashboard;
pub mod history;

use serde_json::Value;

use crate::catalog::ToolId;
use crate::core::server::ToolRegistry;

/// Register every assistant tool
pub fn register_all(registry: &mut ToolRegistry) {
    connections::register(registry);
    ask::register(registry);
    history::register(registry);
    dashboard::register(registry);
}

/// Extract a required string parameter
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing required parameter: {}", key))
}

/// Extract and validate the `tool` parameter
pub(crate) fn tool_id(args: &Value) -> Result<ToolId, String> {
    required_str(args, "tool")?
        .parse::<ToolId>()
        .map_err(|e| e.to_string())
}
