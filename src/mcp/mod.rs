//! MCP (Model Context Protocol) server for editor and assistant integration.
//!
//! Exposes tools: analyze_title, analyze_abstract, analyze_draft, list_guide_pages.

use crate::analyzer::FeedbackEngine;
use crate::guide::Page;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, warn};

/// JSON-RPC "method not found"
pub const METHOD_NOT_FOUND: i32 = -32601;

/// MCP JSON-RPC request
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Tool definition for MCP tools/list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDef {
    name: &'static str,
    description: &'static str,
    input_schema: InputSchema,
}

#[derive(Debug, Serialize)]
struct InputSchema {
    #[serde(rename = "type")]
    typ: &'static str,
    properties: serde_json::Value,
    required: Vec<&'static str>,
}

fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "analyze_title",
            description: "Check a paper title against length, causal wording and two-part structure heuristics",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "title": { "type": "string", "description": "Paper title" }
                }),
                required: vec!["title"],
            },
        },
        ToolDef {
            name: "analyze_abstract",
            description: "Check an abstract for length, reported findings and a contribution statement",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "abstract": { "type": "string", "description": "Abstract text" }
                }),
                required: vec!["abstract"],
            },
        },
        ToolDef {
            name: "analyze_draft",
            description: "Read a draft file holding a title and abstract and return feedback for both",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "file": { "type": "string", "description": "Path to draft (.md, .txt)" }
                }),
                required: vec!["file"],
            },
        },
        ToolDef {
            name: "list_guide_pages",
            description: "List the sections of the economics writing guide",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({}),
                required: vec![],
            },
        },
    ]
}

/// Handle a single JSON-RPC request and return a response.
pub fn handle_request(req: &JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.clone();
    let result = match req.method.as_str() {
        "initialize" => serde_json::json!({
            "protocolVersion": "0.1.0",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "econwrite", "version": env!("CARGO_PKG_VERSION") }
        }),
        "tools/list" => serde_json::json!({ "tools": tool_defs() }),
        "tools/call" => call_tool(req.params.as_ref()),
        other => {
            debug!(method = other, "unknown method");
            return JsonRpcResponse {
                jsonrpc: "2.0",
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: METHOD_NOT_FOUND,
                    message: format!("Method not found: {}", other),
                }),
            };
        }
    };

    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}

fn call_tool(params: Option<&serde_json::Value>) -> serde_json::Value {
    // Some clients wrap the call inside a nested "params" key
    let call = params.and_then(|p| p.get("params").or(Some(p)));
    let name = call
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("");
    let args = call
        .and_then(|p| p.get("arguments"))
        .and_then(|a| a.as_object())
        .cloned()
        .unwrap_or_default();
    let arg = |key: &str| args.get(key).and_then(|v| v.as_str()).unwrap_or("");

    let result = match name {
        "analyze_title" => Ok(run_analyze_title(arg("title"))),
        "analyze_abstract" => Ok(run_analyze_abstract(arg("abstract"))),
        "analyze_draft" => run_analyze_draft(arg("file")),
        "list_guide_pages" => Ok(run_list_pages()),
        _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
    };

    match result {
        Ok(val) => serde_json::json!({
            "content": [{ "type": "text", "text": serde_json::to_string(&val).unwrap_or_else(|_| "{}".to_string()) }]
        }),
        Err(e) => serde_json::json!({
            "content": [{ "type": "text", "text": format!("Error: {}", e) }],
            "isError": true
        }),
    }
}

/// Run the MCP server loop (stdin / stdout).
pub fn run_mcp_server() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "ignoring malformed request");
                continue;
            }
        };

        let response = handle_request(&req);
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn run_analyze_title(title: &str) -> serde_json::Value {
    let feedback = FeedbackEngine::new().evaluate_title(title);
    serde_json::json!({
        "wordCount": feedback.word_count,
        "advisories": feedback.advisories,
        "text": feedback.text(),
    })
}

fn run_analyze_abstract(text: &str) -> serde_json::Value {
    let feedback = FeedbackEngine::new().evaluate_abstract(text);
    serde_json::json!({
        "wordCount": feedback.word_count,
        "advisories": feedback.advisories,
        "text": feedback.text(),
    })
}

fn run_analyze_draft(file: &str) -> anyhow::Result<serde_json::Value> {
    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("File not found: {}", file);
    }
    let work_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let report = crate::analyze_draft_file(path, work_dir, None)?;
    Ok(serde_json::to_value(&report)?)
}

fn run_list_pages() -> serde_json::Value {
    let pages: Vec<serde_json::Value> = Page::ALL
        .iter()
        .map(|p| serde_json::json!({ "slug": p.slug(), "label": p.label() }))
        .collect();
    serde_json::json!({ "pages": pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn make_request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: Some("2.0".to_string()),
            id: Some(serde_json::json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn call(name: &str, arguments: serde_json::Value) -> serde_json::Value {
        let req = make_request(
            "tools/call",
            Some(serde_json::json!({ "name": name, "arguments": arguments })),
        );
        handle_request(&req).result.unwrap()
    }

    fn payload(result: &serde_json::Value) -> serde_json::Value {
        let text = result["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn initialize_returns_server_info() {
        let resp = handle_request(&make_request("initialize", None));
        assert_eq!(resp.jsonrpc, "2.0");
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "econwrite");
        assert!(result["serverInfo"]["version"].is_string());
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[test]
    fn tools_list_has_four_tools() {
        let result = handle_request(&make_request("tools/list", None))
            .result
            .unwrap();
        let tools = result["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "analyze_title",
                "analyze_abstract",
                "analyze_draft",
                "list_guide_pages"
            ]
        );
        for tool in tools {
            assert_eq!(tool["inputSchema"]["type"], "object");
            assert!(tool["inputSchema"]["required"].is_array());
        }
    }

    #[test]
    fn analyze_title_tool() {
        let result = call(
            "analyze_title",
            serde_json::json!({ "title": "Monetary Policy and Inequality: A New Channel" }),
        );
        assert!(result.get("isError").is_none());
        let out = payload(&result);
        assert_eq!(out["wordCount"], 7);
        assert_eq!(out["advisories"].as_array().unwrap().len(), 2);
        assert_eq!(out["advisories"][1]["rule"], "title-dual-part");
    }

    #[test]
    fn analyze_abstract_tool_empty() {
        let out = payload(&call("analyze_abstract", serde_json::json!({ "abstract": "" })));
        assert_eq!(out["wordCount"], 0);
        let rules: Vec<&str> = out["advisories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["rule"].as_str().unwrap())
            .collect();
        assert_eq!(
            rules,
            vec![
                "abstract-too-short",
                "abstract-missing-results",
                "abstract-missing-contribution"
            ]
        );
    }

    #[test]
    fn analyze_draft_tool_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("paper.md");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Title: Trade and Wages").unwrap();
        writeln!(f, "Abstract: We find that tariffs lower wages.").unwrap();
        drop(f);

        let result = call(
            "analyze_draft",
            serde_json::json!({ "file": path.to_str().unwrap() }),
        );
        assert!(result.get("isError").is_none(), "got {:?}", result);
        let out = payload(&result);
        assert_eq!(out["title"]["wordCount"], 3);
        assert_eq!(out["abstract"]["advisories"][1]["rule"], "abstract-findings-magnitudes");
    }

    #[test]
    fn analyze_draft_missing_file_is_tool_error() {
        let result = call(
            "analyze_draft",
            serde_json::json!({ "file": "/nonexistent/draft.md" }),
        );
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("File not found"));
    }

    #[test]
    fn list_guide_pages_tool() {
        let out = payload(&call("list_guide_pages", serde_json::json!({})));
        let pages = out["pages"].as_array().unwrap();
        assert_eq!(pages.len(), 15);
        assert_eq!(pages[0]["slug"], "overview");
        assert_eq!(pages[4]["label"], "4. Title & Abstract");
    }

    #[test]
    fn unknown_tool_is_tool_error() {
        let result = call("nonexistent_tool", serde_json::json!({}));
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Unknown tool"));
    }

    #[test]
    fn unknown_method_returns_method_not_found() {
        let resp = handle_request(&make_request("nonexistent/method", None));
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn request_ids_are_echoed() {
        let json = r#"{"jsonrpc":"2.0","id":"abc-123","method":"tools/list"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(handle_request(&req).id, Some(serde_json::json!("abc-123")));

        let json = r#"{"jsonrpc":"2.0","method":"initialize"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert!(handle_request(&req).id.is_none());
    }

    #[test]
    fn nested_params_are_accepted() {
        let req = make_request(
            "tools/call",
            Some(serde_json::json!({
                "params": {
                    "name": "analyze_title",
                    "arguments": { "title": "Short" }
                }
            })),
        );
        let out = payload(&handle_request(&req).result.unwrap());
        assert_eq!(out["advisories"][0]["rule"], "title-too-short");
    }
}
