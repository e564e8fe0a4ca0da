use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::constants::{CONTENT_TYPE_JSON, HEADER_CONTENT_TYPE};
use crate::validation::strip_control_chars;

/// Operations a Function response must support for the helpers to decorate it
///
/// Hosts with their own response type implement this trait; [`FunctionResponse`]
/// is the implementation used when the helpers construct responses themselves.
pub trait MutableResponse {
    /// Append a header value, keeping any values already set under `name`
    fn append_header(&mut self, name: &str, value: &str);

    /// Replace all headers
    fn set_headers(&mut self, headers: HashMap<String, String>);

    fn set_status_code(&mut self, status_code: u16);

    fn set_body(&mut self, body: Value);
}

/// A mutable header/status/body bag returned from a Function invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// HTTP status code (200, 400, 500, etc.)
    pub status_code: u16,

    /// Response headers as a map of header name to list of values
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,

    /// Response body; strings are sent verbatim, everything else as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Default for FunctionResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionResponse {
    /// Create an empty 200 response
    pub fn new() -> Self {
        Self {
            status_code: 200,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a JSON response with the given status and body
    pub fn json(status_code: u16, body: Value) -> Self {
        let mut response = Self::new();
        response.append_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        response.set_status_code(status_code);
        response.set_body(body);
        response
    }

    /// First value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Check if the response has a body
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Render the body as it goes over the wire
    pub fn body_string(&self) -> String {
        match &self.body {
            None => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Check if the response is a server error (5xx status code)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }
}

impl MutableResponse for FunctionResponse {
    fn append_header(&mut self, name: &str, value: &str) {
        self.headers
            .entry(name.to_string())
            .or_default()
            .push(strip_control_chars(value));
    }

    fn set_headers(&mut self, headers: HashMap<String, String>) {
        self.headers = headers
            .into_iter()
            .map(|(name, value)| (name, vec![strip_control_chars(&value)]))
            .collect();
    }

    fn set_status_code(&mut self, status_code: u16) {
        self.status_code = status_code;
    }

    fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_function_response_creation() {
        let res = FunctionResponse::new();

        assert_eq!(res.status_code, 200);
        assert!(res.headers.is_empty());
        assert!(!res.has_body());
        assert_eq!(res.body_string(), "");
    }

    #[test]
    fn test_append_header_keeps_existing_values() {
        let mut res = FunctionResponse::new();
        res.append_header("Set-Cookie", "session=abc");
        res.append_header("Set-Cookie", "token=xyz");

        assert_eq!(res.headers.get("Set-Cookie").unwrap().len(), 2);
        assert_eq!(res.header("set-cookie"), Some("session=abc"));
    }

    #[test]
    fn test_append_header_strips_control_characters() {
        let mut res = FunctionResponse::new();
        res.append_header("X-Origin", "example.org\r\nX-Injected: 1");

        assert_eq!(res.header("x-origin"), Some("example.orgX-Injected: 1"));
    }

    #[test]
    fn test_set_headers_replaces_everything() {
        let mut res = FunctionResponse::new();
        res.append_header("X-Old", "1");

        let mut headers = HashMap::new();
        headers.insert("X-New".to_string(), "2".to_string());
        res.set_headers(headers);

        assert!(res.header("X-Old").is_none());
        assert_eq!(res.header("X-New"), Some("2"));
    }

    #[test]
    fn test_json_response() {
        let res = FunctionResponse::json(400, json!({"error": {"message": "bad"}}));

        assert_eq!(res.status_code, 400);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.body_string(), r#"{"error":{"message":"bad"}}"#);
    }

    #[test]
    fn test_string_body_is_sent_verbatim() {
        let mut res = FunctionResponse::new();
        res.set_body(Value::String("Invalid credentials".to_string()));
        assert_eq!(res.body_string(), "Invalid credentials");
    }

    #[test]
    fn test_function_response_defaults() {
        let json = r#"{"status_code": 204}"#;

        let parsed: FunctionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status_code, 204);
        assert!(parsed.headers.is_empty());
        assert!(!parsed.has_body());
    }

    #[test]
    fn test_status_code_ranges() {
        let codes = vec![(200, false), (400, false), (499, false), (500, true), (599, true), (600, false)];

        for (code, is_server_err) in codes {
            let mut res = FunctionResponse::new();
            res.set_status_code(code);
            assert_eq!(
                res.is_server_error(),
                is_server_err,
                "Failed for status code {}",
                code
            );
        }
    }
}
