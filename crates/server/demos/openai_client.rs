//! Ask an OpenAI model a question with serpbridge attached as a remote MCP
//! tool through the Responses API.
//!
//! ```sh
//! OPENAI_API_KEY=... SERPBRIDGE_API_KEY=... \
//!   cargo run -p serpbridge-server --example openai_client -- \
//!   --server-url https://mcp.example.com/mcp "Compare backlinks of example.com and example.org"
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::time::Duration;

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

#[derive(Parser, Debug)]
struct Args {
    /// Public URL of the serpbridge MCP endpoint
    #[arg(long, env = "SERPBRIDGE_URL")]
    server_url: String,

    /// Upstream API key, sent to serpbridge as the bearer token
    #[arg(long, env = "SERPBRIDGE_API_KEY", hide_env_values = true)]
    serpbridge_key: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: String,

    #[arg(long, default_value = "gpt-4.1")]
    model: String,

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
        "input": args.prompt,
        "tools": [{
            "type": "mcp",
            "server_label": "serpbridge",
            "server_url": args.server_url,
            "headers": { "Authorization": format!("Bearer {}", args.serpbridge_key) },
            "require_approval": "never",
        }],
    });

    let response = client
        .post(RESPONSES_URL)
        .bearer_auth(&args.openai_key)
        .json(&body)
        .send()
        .await
        .context("request to OpenAI failed")?;

    let status = response.status();
    let payload: Value = response.json().await.context("invalid JSON from OpenAI")?;
    if !status.is_success() {
        bail!("OpenAI returned {}: {}", status, payload);
    }

    for item in payload["output"].as_array().into_iter().flatten() {
        match item["type"].as_str() {
            Some("mcp_list_tools") => {
                let count = item["tools"].as_array().map_or(0, Vec::len);
                eprintln!("serpbridge offered {} tools", count);
            }
            Some("mcp_call") => eprintln!("-> tool {} {}", item["name"], item["arguments"]),
            Some("message") => {
                for part in item["content"].as_array().into_iter().flatten() {
                    if part["type"] == "output_text" {
                        println!("{}", part["text"].as_str().unwrap_or_default());
                    }
                }
            }
            _ => {}
        }
    }

    Ok(())
}
