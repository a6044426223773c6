//! Argument validation errors raised while mapping tool arguments onto an
//! upstream request.

/// Reasons a set of tool arguments cannot be turned into an upstream request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("arguments must be a JSON object")]
    NotAnObject,

    #[error("missing required argument `{0}`")]
    Missing(&'static str),

    #[error("unknown argument `{0}`")]
    Unknown(String),

    #[error("argument `{name}` must be {expected}")]
    InvalidType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("argument `{name}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("argument `{name}` must be one of {allowed}, got `{value}`")]
    InvalidChoice {
        name: &'static str,
        value: String,
        allowed: String,
    },

    #[error("argument `{0}` must not be empty")]
    Empty(&'static str),
}
