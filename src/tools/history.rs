/// Query History Tool
///
/// Returns the session's most recent queries, newest first.

use serde_json::{Value, json};

use crate::core::server::{MCPTool, ToolContext, ToolRegistry};

const DEFAULT_LIMIT: usize = 5;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        MCPTool {
            name: "query_history".to_string(),
            description: "Show recent queries and their reports for this session, newest first."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of entries (default 5)"
                    }
                }
            }),
        },
        Box::new(query_history),
    );
}

fn query_history(ctx: &mut ToolContext<'_>, args: Value) -> Result<Value, String> {
    let limit = match args.get("limit") {
        None | Some(Value::Null) => DEFAULT_LIMIT,
        Some(v) => v
            .as_u64()
            .filter(|n| *n > 0)
            .ok_or_else(|| "limit must be a positive integer".to_string())? as usize,
    };

    let history = &ctx.session.history;
    let entries: Vec<Value> = history
        .recent(limit)
        .zip((1..=history.total()).rev())
        .map(|(entry, number)| {
            json!({
                "number": number,
                "query": entry.query,
                "time": entry.time_label(),
                "timestamp": entry.timestamp,
                "report": entry.report,
            })
        })
        .collect();

    Ok(json!({
        "total": history.total(),
        "entries": entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolCatalog;
    use crate::router::QueryRouter;
    use crate::session::Session;
    use std::sync::Arc;

    #[test]
    fn test_history_newest_first_with_numbers() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        for q in ["one", "two", "three"] {
            session.ask(&router, q);
        }
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };

        let listing = query_history(&mut ctx, json!({"limit": 2})).unwrap();
        assert_eq!(listing["total"], 3);
        let entries = listing["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["query"], "three");
        assert_eq!(entries[0]["number"], 3);
        assert_eq!(entries[1]["query"], "two");
        assert_eq!(entries[1]["number"], 2);
    }

    #[test]
    fn test_history_default_and_invalid_limit() {
        let router = QueryRouter::new(Arc::new(ToolCatalog::new()));
        let mut session = Session::default();
        for i in 0..8 {
            session.ask(&router, &format!("q{}", i));
        }
        let mut ctx = ToolContext {
            router: &router,
            session: &mut session,
        };
        let listing = query_history(&mut ctx, json!({})).unwrap();
        assert_eq!(listing["entries"].as_array().unwrap().len(), DEFAULT_LIMIT);
        assert!(query_history(&mut ctx, json!({"limit": 0})).is_err());
        assert!(query_history(&mut ctx, json!({"limit": "many"})).is_err());
    }
}
