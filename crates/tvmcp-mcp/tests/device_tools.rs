//! End-to-end checks of the device tool catalog through the JSON-RPC front

use serde_json::{json, Value};
use std::sync::Arc;

use tvmcp_core::testing::FakeShell;
use tvmcp_mcp::{device_registry, GovernanceConfig, McpServer, ScreenshotSettings};

fn server(shell: FakeShell) -> (McpServer, Arc<FakeShell>) {
    let shell = Arc::new(shell);
    let settings = ScreenshotSettings {
        remote_dir: "/sdcard".to_string(),
        local_dir: std::env::temp_dir(),
    };
    let registry = device_registry(shell.clone(), settings, GovernanceConfig::default())
        .expect("device tools register");
    (McpServer::new(registry), shell)
}

async fn call(server: &McpServer, request: Value) -> Value {
    let body = serde_json::to_vec(&request).unwrap();
    let response = server.process_message(&body).await.unwrap().expect("response");
    serde_json::to_value(response).unwrap()
}

async fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    let response = call(
        server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }),
    )
    .await;
    assert!(response.get("error").is_none(), "unexpected fault: {response}");
    response["result"].clone()
}

fn first_text(result: &Value) -> String {
    result["content"][0]["text"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn lists_all_device_tools() {
    let (server, _) = server(FakeShell::new());
    let response = call(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;

    let names: Vec<&str> = response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "launch_tv_app",
            "get_installed_tv_apps",
            "take_screenshot",
            "send_key_event",
            "send_nav_key_event",
            "type_text",
            "tap_screen"
        ]
    );

    let tap = &response["result"]["tools"][6];
    assert_eq!(tap["inputSchema"]["properties"]["x"]["type"], "integer");
    assert_eq!(tap["inputSchema"]["required"], json!(["x", "y"]));
}

#[tokio::test]
async fn invalid_nav_key_lists_allowed_values() {
    let (server, shell) = server(FakeShell::new());
    let result = call_tool(&server, "send_nav_key_event", json!({"nav_key": "banana"})).await;

    assert_eq!(
        first_text(&result),
        "Invalid nav_key: 'banana'. Use one of 'up', 'down', 'left', 'right', 'select', 'back', 'home'."
    );
    assert!(shell.commands().is_empty());
}

#[tokio::test]
async fn tap_rejects_non_integer_coordinates() {
    let (server, shell) = server(FakeShell::new());
    let result = call_tool(&server, "tap_screen", json!({"x": "abc", "y": 5})).await;

    assert_eq!(first_text(&result), "The 'x' parameter is required and must be an integer.");
    assert!(shell.commands().is_empty());
}

#[tokio::test]
async fn tap_sends_coordinates() {
    let (server, shell) = server(FakeShell::new());
    call_tool(&server, "tap_screen", json!({"x": 100, "y": 200})).await;
    assert_eq!(shell.commands(), vec!["shell input tap 100 200".to_string()]);
}

#[tokio::test]
async fn unknown_tool_is_a_tool_error() {
    let (server, _) = server(FakeShell::new());
    let result = call_tool(&server, "reboot_tv", json!({})).await;
    assert_eq!(result["isError"], true);
    assert!(first_text(&result).contains("reboot_tv"));
}

#[tokio::test]
async fn every_tool_answers_with_content_when_the_shell_fails() {
    let (server, _) = server(FakeShell::new().fail("", "Error: device offline"));
    let calls = [
        ("launch_tv_app", json!({"app_package": "com.example.tv"})),
        ("get_installed_tv_apps", json!({})),
        ("take_screenshot", json!({})),
        ("send_key_event", json!({"key_code": "KEYCODE_HOME"})),
        ("send_nav_key_event", json!({"nav_key": "up"})),
        ("type_text", json!({"text": "hello world"})),
        ("tap_screen", json!({"x": 1, "y": 2})),
    ];

    for (name, arguments) in calls {
        let result = call_tool(&server, name, arguments).await;
        let content = result["content"].as_array().unwrap();
        assert!(!content.is_empty(), "{name} returned no content");
        assert_eq!(content[0]["type"], "text", "{name}");
    }
}

#[tokio::test]
async fn text_input_escapes_spaces() {
    let (server, shell) = server(FakeShell::new());
    call_tool(&server, "type_text", json!({"text": "hello tv world"})).await;
    assert_eq!(shell.commands(), vec!["shell input text 'hello%stv%sworld'".to_string()]);
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let (server, _) = server(FakeShell::new());
    let err = server.process_message(b"{not json").await.unwrap_err();
    assert_eq!(err.to_jsonrpc_error().code, -32700);
}

#[tokio::test]
async fn unknown_method_keeps_the_request_id() {
    let (server, _) = server(FakeShell::new());
    let response =
        call(&server, json!({"jsonrpc": "2.0", "id": "abc", "method": "resources/list"})).await;
    assert_eq!(response["id"], "abc");
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn notifications_get_no_response() {
    let (server, _) = server(FakeShell::new());
    let body = br#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
    assert!(server.process_message(body).await.unwrap().is_none());
}
