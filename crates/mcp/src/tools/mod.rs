mod registry;
pub mod upstream;

pub use registry::{Tool, ToolRegistry};
pub use upstream::{upstream_registry, UpstreamTool};
