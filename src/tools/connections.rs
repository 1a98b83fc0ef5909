/// Connection Tools
///
/// `list_tools`, `connect_tool` and `disconnect_tool` manage the calling
/// session's connection set. Connecting is simulated: nothing leaves the
/// process.

use serde_json::{Value, json};

use crate::core::server::{MCPTool, ToolContext, ToolRegistry};

use super::tool_id;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        MCPTool {
            name: "list_tools".to_string(),
            description: "List the business tools that can be connected, with their connection state."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Box::new(list_tools),
    );

    registry.register(
        MCPTool {
            name: "connect_tool".to_string(),
            description: "Connect a business tool to this session.".to_string(),
            input_schema: tool_schema("Tool identifier to connect"),
        },
        Box::new(connect_tool),
    );

    registry.register(
        MCPTool {
            name: "disconnect_tool".to_string(),
            description: "Disconnect a business tool from this session.".to_string(),
            input_schema: tool_schema("Tool identifier to disconnect"),
        },
        Box::new(disconnect_tool),
    );
}

fn tool_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "tool": {
                "type": "string",
                "description": description,
                "enum": [
                    "asana", "google_analytics", "quickbooks", "zendesk",
                    "google_calendar", "hootsuite", "hubspot", "slack"
                ]
            }
        },
        "required": ["tool"]
    })
}

fn list_tools(ctx: &mut ToolContext<'_>, _args: Value) -> Result<Value, String> {
    let connections = &ctx.session.connections;
    let catalog = ctx.router.catalog();
    let tools: Vec<Value> = catalog
        .descriptors()
        .map(|d| {
            json!({
                "id": d.id,
                "name": d.name,
                "description": d.description,
                "category": d.category,
                "icon": d.icon,
                "connected": catalog.is_connected(d.id, connections),
            })
        })
        .collect();

    Ok(json!({
        "connected": connections.len(),
        "available": catalog.tool_count() - connections.len(),
        "tools": tools,
    }))
}

fn connect_tool(ctx: &mut ToolContext<'_>, args: Value) -> Result<Value, String> {
    let id = tool_id(&args)?;
    let changed = ctx.session.connections.connect(id);
    tracing::info!(tool = %id, changed, "Tool connected");
    Ok(json!({
        "tool": id,
        "name": ctx.catalog().descriptor_of(id).name,
        "connected": true,
        "changed": changed,
        "connected_count": ctx.session.connections.len(),
    }))
}

fn disconnect_tool(ctx: &mut ToolContext<'_>, args: Value) -> Result<Value, String> {
    let id = tool_id(&args)?;
    let changed = ctx.session.connections.disconnect(id);
    tracing::info!(tool = %id, changed, "Tool disconnected");
    Ok(json!({
        "tool": id,
        "name": ctx.catalog().descriptor_of(id).name,
        "connected": false,
        "changed": changed,
        "connected_count": ctx.session.connections.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ToolCatalog, ToolId};
    use crate::router::QueryRouter;
    use crate::session::Session;
    use std::sync::Arc;

    #[test]
    fn test_connect_disconnect_cycle() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };

        let first = connect_tool(&mut ctx, json!({"tool": "zendesk"})).unwrap();
        assert_eq!(first["changed"], true);
        assert_eq!(first["name"], "Zendesk");
        let again = connect_tool(&mut ctx, json!({"tool": "zendesk"})).unwrap();
        assert_eq!(again["changed"], false);

        let listing = list_tools(&mut ctx, json!({})).unwrap();
        assert_eq!(listing["connected"], 1);
        assert_eq!(listing["available"], 7);
        assert_eq!(listing["tools"][3]["id"], "zendesk");
        assert_eq!(listing["tools"][3]["connected"], true);
        assert_eq!(listing["tools"][0]["connected"], false);

        let gone = disconnect_tool(&mut ctx, json!({"tool": "zendesk"})).unwrap();
        assert_eq!(gone["connected_count"], 0);
        assert!(!session.connections.contains(ToolId::Zendesk));
    }

    #[test]
    fn test_missing_tool_parameter() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };
        let err = connect_tool(&mut ctx, json!({})).unwrap_err();
        assert_eq!(err, "Missing required parameter: tool");
    }
}
