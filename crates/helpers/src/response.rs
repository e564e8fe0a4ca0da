//! CORS headers for Function responses

use runtime_helpers_common::constants::{
    DEFAULT_CORS_HEADERS, DEFAULT_CORS_METHODS, HEADER_ALLOW_HEADERS, HEADER_ALLOW_METHODS,
    HEADER_ALLOW_ORIGIN,
};
use runtime_helpers_common::{FunctionResponse, MutableResponse, join_header_values};

/// Values for the three `Access-Control-Allow-*` headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsOptions {
    /// An origin URL, or `*` for any origin
    pub origin: String,
    pub methods: Vec<String>,
    pub headers: Vec<String>,
}

impl CorsOptions {
    /// Options for `origin` with the default methods (`POST`, `OPTIONS`) and
    /// headers (`Content-Type`)
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            methods: DEFAULT_CORS_METHODS.iter().map(|m| m.to_string()).collect(),
            headers: DEFAULT_CORS_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub fn any_origin() -> Self {
        Self::new("*")
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }
}

/// Append the CORS headers to `response` and hand it back for chaining
pub fn enable_cors<'a, R>(response: &'a mut R, options: &CorsOptions) -> &'a mut R
where
    R: MutableResponse + ?Sized,
{
    response.append_header(HEADER_ALLOW_ORIGIN, &options.origin);
    response.append_header(HEADER_ALLOW_METHODS, &join_header_values(&options.methods));
    response.append_header(HEADER_ALLOW_HEADERS, &join_header_values(&options.headers));
    response
}

/// A new empty 200 response carrying the CORS headers
pub fn create_cors_response(options: &CorsOptions) -> FunctionResponse {
    create_cors_response_with(FunctionResponse::new, options)
}

/// Like [`create_cors_response`], for hosts with their own response type
pub fn create_cors_response_with<R, F>(factory: F, options: &CorsOptions) -> R
where
    R: MutableResponse,
    F: FnOnce() -> R,
{
    let mut response = factory();
    enable_cors(&mut response, options);
    response
}
