//! Transport layer for the serpbridge SDK.

pub mod http;

pub use http::{HttpTransport, UpstreamResponse};
