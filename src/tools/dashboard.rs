/// Dashboard Tool
///
/// Metric snapshot of every tool connected to the session.

use serde_json::{Value, json};

use crate::core::server::{MCPTool, ToolContext, ToolRegistry};
use crate::dashboard;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        MCPTool {
            name: "dashboard".to_string(),
            description: "Key metrics from each connected tool.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Box::new(show_dashboard),
    );
}

fn show_dashboard(ctx: &mut ToolContext<'_>, _args: Value) -> Result<Value, String> {
    let snapshot = dashboard::snapshot(ctx.catalog(), &ctx.session.connections);
    serde_json::to_value(snapshot).map_err(|e| e.to_string())
}
