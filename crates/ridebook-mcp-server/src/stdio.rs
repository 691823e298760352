//! stdio transport: line-delimited JSON-RPC on stdin/stdout.
//!
//! One process is one session; the loop ends when stdin closes. All
//! logging goes to stderr because stdout carries protocol frames.

use std::io::{self, BufRead, Write};

use crate::rpc::{JsonRpcRequest, JsonRpcResponse, McpServer, PARSE_ERROR};

pub async fn run(server: McpServer) -> anyhow::Result<()> {
    tracing::info!("ridebook-mcp server running on stdio");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response =
                    JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                write_response(&mut stdout, &response)?;
                continue;
            }
        };

        let response = server.handle_request(request).await;
        if response.should_send() {
            write_response(&mut stdout, &response)?;
        }
    }

    Ok(())
}

fn write_response(stdout: &mut io::Stdout, response: &JsonRpcResponse) -> anyhow::Result<()> {
    let payload = serde_json::to_string(response)?;
    writeln!(stdout, "{payload}")?;
    stdout.flush()?;
    Ok(())
}
