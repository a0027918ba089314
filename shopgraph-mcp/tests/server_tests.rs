//! JSON-RPC over stdio tests

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use shopgraph_core::{ConnectionManager, InMemoryGraph, Neo4jSettings};
use shopgraph_mcp::{McpServer, SERVER_NAME};

fn server_with(graph: &InMemoryGraph) -> McpServer {
    let settings = Neo4jSettings::new()
        .uri("bolt://localhost:7687")
        .username("neo4j")
        .password("password");
    McpServer::new(Arc::new(ConnectionManager::new(
        Arc::new(settings),
        Arc::new(graph.clone()),
    )))
}

fn demo_graph() -> InMemoryGraph {
    let graph = InMemoryGraph::new();
    graph.add_product("P1", "Pour-over kettle");
    graph.add_product("P2", "Coffee grinder");
    graph.add_customer("A", "Alice Anders", "alice@example.com");
    graph.add_customer("B", "Bob Brown", "bob@example.com");
    graph.add_order("A", &["P1"]);
    graph.add_order("B", &["P1", "P2"]);
    graph
}

async fn call(server: &McpServer, request: Value) -> Value {
    let line = server.handle_line(&request.to_string()).await.unwrap();
    serde_json::from_str(&line).unwrap()
}

fn tool_payload(response: &Value) -> (bool, Value) {
    let result = &response["result"];
    let text = result["content"][0]["text"].as_str().unwrap();
    (
        result["isError"].as_bool().unwrap(),
        serde_json::from_str(text).unwrap(),
    )
}

#[tokio::test]
async fn test_initialize() {
    let server = server_with(&demo_graph());

    let response = call(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})).await;

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert!(response["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_tools_list() {
    let server = server_with(&demo_graph());

    let response = call(&server, json!({"jsonrpc": "2.0", "id": "list", "method": "tools/list"})).await;

    let names: Vec<&str> = response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["recommend_product", "search_customer"]);
    assert!(response["result"]["tools"][0]["inputSchema"]["properties"].is_object());
}

#[tokio::test]
async fn test_tools_call_success() {
    let server = server_with(&demo_graph());

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "recommend_product", "arguments": {"customer_id": "A", "limit": 5}}
        }),
    )
    .await;

    let (is_error, payload) = tool_payload(&response);
    assert!(!is_error);
    assert_eq!(payload[0]["productId"], "P2");
    assert_eq!(payload[0]["score"], 1);
}

#[tokio::test]
async fn test_tools_call_unknown_tool() {
    let graph = demo_graph();
    let server = server_with(&graph);

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "tools/call",
            "params": {"name": "delete_everything", "arguments": {}}
        }),
    )
    .await;

    let (is_error, payload) = tool_payload(&response);
    assert!(is_error);
    assert_eq!(payload["kind"], "UnknownToolError");
    assert!(payload["message"].as_str().unwrap().contains("delete_everything"));
    assert_eq!(graph.sessions_opened(), 0);
}

#[tokio::test]
async fn test_tools_call_invalid_argument() {
    let server = server_with(&demo_graph());

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": {"name": "search_customer", "arguments": {}}
        }),
    )
    .await;

    let (is_error, payload) = tool_payload(&response);
    assert!(is_error);
    assert_eq!(payload["kind"], "InvalidArgumentError");
    assert!(payload["message"].as_str().unwrap().contains("'q'"));
}

#[tokio::test]
async fn test_unknown_method() {
    let server = server_with(&demo_graph());

    let response = call(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "resources/list"})).await;

    assert_eq!(response["error"]["code"], -32601);
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_parse_error() {
    let server = server_with(&demo_graph());

    let line = server.handle_line("{not json").await.unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();

    assert_eq!(response["error"]["code"], -32700);
    assert_eq!(response["id"], Value::Null);
}

#[tokio::test]
async fn test_notification_has_no_response() {
    let server = server_with(&demo_graph());

    let line = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
    assert!(server.handle_line(&line).await.is_none());
}

#[tokio::test]
async fn test_serve_answers_every_request() {
    let server = server_with(&demo_graph());

    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        String::new(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "search_customer", "arguments": {"q": "alice"}}}).to_string(),
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {"name": "recommend_product", "arguments": {"customer_id": "B"}}}).to_string(),
    ]
    .join("\n");

    let mut output = Vec::new();
    server
        .serve(Cursor::new(input.into_bytes()), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    // Concurrent handling: order is not guaranteed, ids are
    let mut ids: Vec<i64> = responses.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let search = responses.iter().find(|r| r["id"] == 3).unwrap();
    let (is_error, payload) = tool_payload(search);
    assert!(!is_error);
    assert_eq!(payload[0]["name"], "Alice Anders");
}

/// A stdout whose reader went away
struct ClosedPipe;

impl AsyncWrite for ClosedPipe {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed")))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn test_write_failure_stops_reading() {
    let server = server_with(&demo_graph());
    let (mut client, server_end) = tokio::io::duplex(64);

    let request = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string() + "\n";
    client.write_all(request.as_bytes()).await.unwrap();

    let err = server.serve(server_end, ClosedPipe).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

    // Once the reader is gone, input can no longer be delivered
    let rejected = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if client.write_all(b"\n").await.is_err() {
                break;
            }
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(rejected.is_ok());
}
