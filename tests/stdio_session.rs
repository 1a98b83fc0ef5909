/// End-to-end STDIO session: a client connects tools, asks the five quick
/// actions and reads back its history.

use business_assistant::{SessionStore, ToolCatalog};
use business_assistant::core::server::{self, AppState};
use serde_json::{Value, json};

async fn run(requests: &[Value]) -> Vec<Value> {
    let state = AppState::new("stdio-test", "0.0.1", ToolCatalog::new(), SessionStore::new(None));
    let registry = server::initialize_tools();
    let input: String = requests
        .iter()
        .map(|r| format!("{}\n", r))
        .collect();
    let mut output = Vec::new();
    server::serve_lines(&state, &registry, input.as_bytes(), &mut output)
        .await
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn full_session_flow() {
    let responses = run(&[
        json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        call(1, "ask", json!({"query": "executive summary"})),
        call(2, "connect_tool", json!({"tool": "asana"})),
        call(3, "connect_tool", json!({"tool": "quickbooks"})),
        call(4, "ask", json!({"query": "Generate executive summary"})),
        call(5, "ask", json!({"query": "Financial report"})),
        call(6, "ask", json!({"query": "xyzzy nonsense"})),
        call(7, "query_history", json!({})),
        call(8, "dashboard", json!({})),
    ])
    .await;

    assert_eq!(responses.len(), 9);
    assert!(text(&responses[1]).contains("No tools connected"));

    let summary = text(&responses[4]);
    assert!(summary.contains("Generated from 2 connected tools"));
    assert!(summary.contains("Average progress: 70.7%"));
    assert!(summary.contains("1 on track, 1 behind"));
    assert!(summary.contains("Follow up on outstanding invoices"));

    let financial = text(&responses[5]);
    assert!(financial.contains("$78,450"));
    assert!(financial.contains("$23,400"));
    assert!(financial.contains("42.4%"));

    let general = text(&responses[6]);
    assert!(general.contains("Query: xyzzy nonsense"));
    assert!(general.contains("Connected tools: 2"));

    let history: Value = serde_json::from_str(text(&responses[7])).unwrap();
    assert_eq!(history["total"], 4);
    assert_eq!(history["entries"][0]["query"], "xyzzy nonsense");
    assert_eq!(history["entries"][3]["query"], "executive summary");

    let dashboard: Value = serde_json::from_str(text(&responses[8])).unwrap();
    assert_eq!(dashboard["connected"], 2);
}

#[tokio::test]
async fn unknown_tool_identifier_is_a_tool_error() {
    let responses = run(&[call(1, "disconnect_tool", json!({"tool": "myspace"}))]).await;
    assert_eq!(responses[0]["result"]["isError"], true);
    assert_eq!(text(&responses[0]), "Error: Unknown tool: myspace");
}
