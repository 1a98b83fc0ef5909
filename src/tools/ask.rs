/// Query Tools
///
/// `ask` routes a free-text query against the session's connected tools and
/// records it in the session's query log. `quick_actions` lists the canned
/// queries a client can offer as shortcuts.

use serde_json::{Value, json};

use crate::core::server::{MCPTool, ToolContext, ToolRegistry};
use crate::router::{Intent, QUICK_ACTIONS};

use super::required_str;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        MCPTool {
            name: "ask".to_string(),
            description: "Ask the business assistant a question. Answers draw on the connected tools."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text question, e.g. 'executive summary' or 'team availability'"
                    }
                },
                "required": ["query"]
            }),
        },
        Box::new(ask),
    );

    registry.register(
        MCPTool {
            name: "quick_actions".to_string(),
            description: "List the canned quick-action queries.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Box::new(quick_actions),
    );
}

fn ask(ctx: &mut ToolContext<'_>, args: Value) -> Result<Value, String> {
    let query = required_str(&args, "query")?;
    if query.trim().is_empty() {
        return Err("Query must not be empty".to_string());
    }

    tracing::info!(
        intent = %Intent::classify(query),
        connected = ctx.session.connections.len(),
        "Routing query"
    );
    let entry = ctx.session.ask(ctx.router, query);
    Ok(Value::String(entry.report))
}

fn quick_actions(_ctx: &mut ToolContext<'_>, _args: Value) -> Result<Value, String> {
    let actions: Vec<Value> = QUICK_ACTIONS
        .iter()
        .map(|query| json!({ "query": query, "intent": Intent::classify(query).as_str() }))
        .collect();
    Ok(json!({ "actions": actions }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ToolCatalog, ToolId};
    use crate::router::QueryRouter;
    use crate::session::Session;
    use std::sync::Arc;

    #[test]
    fn test_ask_returns_report_and_logs() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        session.connections.connect(ToolId::Zendesk);
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };

        let report = ask(&mut ctx, json!({"query": "  support tickets "})).unwrap();
        assert!(report.as_str().unwrap().starts_with("🎫 SUPPORT REPORT"));
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history.latest().unwrap().query, "  support tickets ");
    }

    #[test]
    fn test_ask_echoes_query_unchanged() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        session.connections.connect(ToolId::Slack);
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };

        let report = ask(&mut ctx, json!({"query": "  What's new? "})).unwrap();
        assert!(report.as_str().unwrap().contains("Query:   What's new? \n"));
    }

    #[test]
    fn test_ask_rejects_blank_query() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };
        assert!(ask(&mut ctx, json!({"query": "   "})).is_err());
        assert!(ask(&mut ctx, json!({})).is_err());
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_quick_actions_listing() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };
        let listing = quick_actions(&mut ctx, json!({})).unwrap();
        let actions = listing["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 5);
        assert_eq!(actions[1]["query"], "Show project status");
        assert_eq!(actions[1]["intent"], "project_status");
    }
}
