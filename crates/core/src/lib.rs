// Core types and functionality for serpbridge: the upstream tool catalog and
// the mapping from tool arguments to upstream HTTP requests

pub mod catalog;
pub mod error;
pub mod request;
pub mod schema;
pub mod types;

pub use catalog::{catalog, lookup, EndpointSpec, ParamKind, ParamLocation, ParamSpec, ToolCategory};
pub use error::ArgumentError;
pub use request::{build_request, UpstreamRequest};
pub use types::*;
