//! Required-parameter validation for Function events

use runtime_helpers_common::constants::{CONTENT_TYPE_JSON, HEADER_CONTENT_TYPE, STATUS_BAD_REQUEST};
use runtime_helpers_common::validation::{find_missing_params, find_non_string_params};
use runtime_helpers_common::{ErrorBody, FunctionEvent, FunctionResponse, MutableResponse};
use serde_json::{Map, Value};
use thiserror::Error;

/// Required parameters were missing or not strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidParameters {
    pub missing: Vec<String>,
    pub non_string: Vec<String>,
    pub more_info: Option<String>,
    message: String,
}

impl InvalidParameters {
    pub fn new(missing: Vec<String>, non_string: Vec<String>, more_info: Option<String>) -> Self {
        let mut sentences = Vec::with_capacity(2);
        if !missing.is_empty() {
            sentences.push(format!(
                "Missing parameter; please provide: '{}'.",
                missing.join(", ")
            ));
        }
        if !non_string.is_empty() {
            sentences.push(format!(
                "Invalid parameter; expected string values for: '{}'.",
                non_string.join(", ")
            ));
        }

        Self {
            message: sentences.join(" "),
            missing,
            non_string,
            more_info,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody::new(self.message.clone(), self.more_info.clone())
    }

    /// Write the 400 response into a host-provided response object
    pub fn apply_to<R: MutableResponse + ?Sized>(&self, response: &mut R) {
        response.append_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        response.set_status_code(STATUS_BAD_REQUEST);
        response.set_body(self.body_value());
    }

    /// Render as a new 400 JSON response
    pub fn into_response(self) -> FunctionResponse {
        FunctionResponse::json(STATUS_BAD_REQUEST, self.body_value())
    }

    fn body_value(&self) -> Value {
        serde_json::to_value(self.to_error_body()).unwrap_or_default()
    }
}

/// Check that every required parameter is present and a string
///
/// On success the event's parameter bag is returned for the caller to read from.
/// `more_info` is a documentation link included in the error body.
pub fn extract_params<'a>(
    event: &'a FunctionEvent,
    required: &[&str],
    more_info: Option<&str>,
) -> Result<&'a Map<String, Value>, InvalidParameters> {
    let missing = find_missing_params(&event.parameters, required);
    let non_string = find_non_string_params(&event.parameters, required);

    if missing.is_empty() && non_string.is_empty() {
        return Ok(&event.parameters);
    }

    Err(InvalidParameters::new(
        missing,
        non_string,
        more_info.map(str::to_string),
    ))
}
