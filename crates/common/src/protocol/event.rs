use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

/// An incoming Function invocation: request headers plus the parameter bag
#[derive(Debug, Clone, Default)]
pub struct FunctionEvent {
    pub headers: HeaderMap,

    /// Query string, form and JSON body parameters merged by the host
    pub parameters: Map<String, Value>,
}

impl FunctionEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header; names or values that are not valid HTTP are skipped
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// First value of a header as UTF-8, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The raw `Authorization` header, if present and valid UTF-8
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// A parameter's value if it is a JSON string
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).and_then(Value::as_str)
    }
}
