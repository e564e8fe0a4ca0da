//! Common types and utilities for the serverless runtime helpers
//!
//! This crate provides the data model, response/event protocol types, validation and
//! small utilities shared by the helper library and the reference function host.

pub mod constants;
pub mod error;
pub mod models;
pub mod protocol;
pub mod utils;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::{HelperError, Result};
pub use models::{Environment, Service, Variable};
pub use protocol::{
    Envelope, ErrorBody, ErrorDetail, FunctionEvent, FunctionResponse, MutableResponse,
};
pub use utils::{
    decode_body, decode_header_token, encode_basic_credentials, iso_timestamp, join_header_values,
    map_to_headers,
};
