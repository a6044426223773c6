//! Ask Claude a question with serpbridge attached through the Messages API
//! MCP connector.
//!
//! The server must be reachable from the public internet (HTTPS, or HTTP
//! behind a tunnel such as ngrok).
//!
//! ```sh
//! ANTHROPIC_API_KEY=... SERPBRIDGE_API_KEY=... \
//!   cargo run -p serpbridge-server --example claude_client -- \
//!   --server-url https://mcp.example.com/mcp "Who ranks for 'rust web framework'?"
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::time::Duration;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

#[derive(Parser, Debug)]
struct Args {
    /// Public URL of the serpbridge MCP endpoint
    #[arg(long, env = "SERPBRIDGE_URL")]
    server_url: String,

    /// Upstream API key, forwarded by Anthropic as the bearer token
    #[arg(long, env = "SERPBRIDGE_API_KEY", hide_env_values = true)]
    serpbridge_key: String,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_key: String,

    #[arg(long, default_value = "claude-sonnet-4-20250514")]
    model: String,

    #[arg(long, default_value_t = 2048)]
    max_tokens: u32,

    prompt: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;

    let body = json!({
        "model": args.model,
        "max_tokens": args.max_tokens,
        "messages": [{ "role": "user", "content": args.prompt }],
        "mcp_servers": [{
            "type": "url",
            "url": args.server_url,
            "name": "serpbridge",
            "authorization_token": args.serpbridge_key,
        }],
    });

    let response = client
        .post(MESSAGES_URL)
        .header("x-api-key", &args.anthropic_key)
        .header("anthropic-version", "2023-06-01")
        .header("anthropic-beta", "mcp-client-2025-04-04")
        .json(&body)
        .send()
        .await
        .context("request to Anthropic failed")?;

    let status = response.status();
    let payload: Value = response.json().await.context("invalid JSON from Anthropic")?;
    if !status.is_success() {
        bail!("Anthropic returned {}: {}", status, payload);
    }

    for block in payload["content"].as_array().into_iter().flatten() {
        match block["type"].as_str() {
            Some("text") => println!("{}", block["text"].as_str().unwrap_or_default()),
            Some("mcp_tool_use") => eprintln!("-> tool {} {}", block["name"], block["input"]),
            Some("mcp_tool_result") => {
                let failed = block["is_error"].as_bool().unwrap_or(false);
                eprintln!("<- tool result{}", if failed { " (error)" } else { "" });
            }
            _ => {}
        }
    }

    eprintln!("usage: {}", payload["usage"]);
    Ok(())
}
