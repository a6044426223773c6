//! # serpbridge SDK
//!
//! Rust client for the SEO and search-data API that serpbridge exposes over
//! MCP. Every operation of the tool catalog can be called by name, or through
//! the typed API groups.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serpbridge_sdk::{SerpBridgeClient, SerpBridgeResult};
//! use serpbridge_sdk::api::SerpQuery;
//!
//! #[tokio::main]
//! async fn main() -> SerpBridgeResult<()> {
//!     let client = SerpBridgeClient::builder()
//!         .api_key("sk-your-api-key")
//!         .build()?;
//!
//!     let results = client
//!         .serp()
//!         .fetch(&SerpQuery::new("rust web framework").country("us"))
//!         .await?;
//!     println!("{}", results);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Calling tools by name
//!
//! ```rust,no_run
//! # async fn example() -> serpbridge_sdk::SerpBridgeResult<()> {
//! let client = serpbridge_sdk::SerpBridgeClient::from_env()?;
//! let response = client
//!     .call("get_domain_info", &serde_json::json!({ "domain": "example.com" }))
//!     .await?;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{SerpBridgeClient, SerpBridgeClientBuilder, ENV_API_KEY, ENV_BASE_URL};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{SerpBridgeError, SerpBridgeResult};
pub use transport::UpstreamResponse;

// Re-export core types for convenience
pub use serpbridge_core::{catalog, lookup, ApiToken, EndpointSpec, ToolCategory};
