//! Helper utilities for serverless Functions
//!
//! Each module is a thin, independent convenience wrapper used from a Function's
//! entry point:
//!
//! - [`auth`]: HTTP Basic authentication against configured credentials
//! - [`environment`]: current-environment lookup and environment variable CRUD
//! - [`event`]: required-parameter validation
//! - [`response`]: CORS headers
//! - [`log`]: a debug-gated, labelled logger
//! - [`fetch`]: HTTP requests with retry and backoff
//! - [`utils`]: JSON envelopes and asset/function lookups
//!
//! Platform objects are passed in explicitly: a [`Context`] carries configuration
//! and the management API client, a [`Runtime`] carries the asset and function
//! registries.

pub mod auth;
pub mod client;
pub mod context;
pub mod environment;
pub mod event;
pub mod fetch;
pub mod log;
pub mod response;
pub mod utils;

pub use auth::{
    ConstantTimeComparator, Credentials, SecretComparator, is_authenticated, is_authenticated_with,
    parse_basic_credentials,
};
pub use client::{
    ApiError, CallCounts, ClientConfig, InMemoryServerless, ServerlessApi, TwilioServerlessClient,
};
pub use context::Context;
pub use environment::{
    get_current_environment, get_environment_variable, get_environment_variables,
    set_environment_variable,
};
pub use event::{InvalidParameters, extract_params};
pub use fetch::{
    FetchError, HttpTransport, RetryDelay, RetryOn, RetryPolicy, RetryingClient, exponential_delay,
};
pub use log::{Console, LogSink, Logger, TracingSink};
pub use response::{CorsOptions, create_cors_response, create_cors_response_with, enable_cors};
pub use utils::{
    Asset, FunctionEntry, Runtime, StaticRuntime, failure, read_asset, require_asset,
    require_function, success,
};

pub use runtime_helpers_common::{
    Environment, FunctionEvent, FunctionResponse, HelperError, MutableResponse, Result, Service,
    Variable,
};
