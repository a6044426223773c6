//! MCP (Model Context Protocol) front end for serpbridge.
//!
//! Protocol types, session lifecycle and the tool registry live here; the
//! stdio transport is built in and the HTTP transport lives in the server
//! crate.

pub mod context;
pub mod error;
pub mod protocol;
pub mod server;
pub mod stdio;
pub mod tools;

pub use context::RequestContext;
pub use error::ToolError;
pub use server::{McpServer, McpSession, SessionPhase};
pub use tools::{upstream_registry, Tool, ToolRegistry, UpstreamTool};
