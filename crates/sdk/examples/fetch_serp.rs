//! Direct SDK usage example.
//!
//! Fetches a results page and the backlink summary of the top result.
//!
//! Run with: SERPBRIDGE_API_KEY=... cargo run --example fetch_serp -- "rust web framework"

use serpbridge_sdk::api::{Device, SerpQuery};
use serpbridge_sdk::{SerpBridgeClient, SerpBridgeResult};

#[tokio::main]
async fn main() -> SerpBridgeResult<()> {
    tracing_subscriber::fmt::init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "rust web framework".to_string());

    // Reads SERPBRIDGE_API_KEY and SERPBRIDGE_API_BASE_URL
    let client = SerpBridgeClient::from_env()?;

    println!("Searching for {:?}...", query);
    let serp = client
        .serp()
        .fetch(&SerpQuery::new(&query).device(Device::Desktop).num(10))
        .await?;

    let organic = serp["organic"].as_array().cloned().unwrap_or_default();
    println!("Found {} organic results", organic.len());
    for (i, result) in organic.iter().take(5).enumerate() {
        println!(
            "  {}. {} ({})",
            i + 1,
            result["title"].as_str().unwrap_or("-"),
            result["link"].as_str().unwrap_or("-")
        );
    }

    if let Some(link) = organic.first().and_then(|r| r["link"].as_str()) {
        if let Some(host) = url::Url::parse(link).ok().and_then(|u| u.host_str().map(String::from)) {
            println!("\nBacklink summary for {}:", host);
            let summary = client.backlinks().summary(&host).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    let usage = client.account().usage().await?;
    println!("\nAccount usage: {}", usage);

    Ok(())
}
