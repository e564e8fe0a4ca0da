//! Input validation for request parameters and remote identifiers
//!
//! This module checks Function parameters against a required-key list and validates
//! management API identifiers before they are interpolated into request paths.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Regex for validating service SIDs (ZS prefix + 32 hex characters)
static SERVICE_SID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ZS[0-9a-fA-F]{32}$").expect("valid service SID regex"));

/// Regex for validating environment SIDs (ZE prefix + 32 hex characters)
static ENVIRONMENT_SID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ZE[0-9a-fA-F]{32}$").expect("valid environment SID regex"));

/// Regex for validating variable SIDs (ZV prefix + 32 hex characters)
static VARIABLE_SID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ZV[0-9a-fA-F]{32}$").expect("valid variable SID regex"));

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid service SID format: {0}")]
    InvalidServiceSid(String),

    #[error("Invalid environment SID format: {0}")]
    InvalidEnvironmentSid(String),

    #[error("Invalid variable SID format: {0}")]
    InvalidVariableSid(String),
}

/// Validate service SID format
///
/// # Examples
///
/// ```
/// use runtime_helpers_common::validation::validate_service_sid;
///
/// assert!(validate_service_sid("ZS0123456789abcdef0123456789abcdef").is_ok());
/// assert!(validate_service_sid("ZE0123456789abcdef0123456789abcdef").is_err());
/// ```
pub fn validate_service_sid(sid: &str) -> Result<(), ValidationError> {
    if !SERVICE_SID_REGEX.is_match(sid) {
        return Err(ValidationError::InvalidServiceSid(truncate(sid)));
    }
    Ok(())
}

/// Validate environment SID format
pub fn validate_environment_sid(sid: &str) -> Result<(), ValidationError> {
    if !ENVIRONMENT_SID_REGEX.is_match(sid) {
        return Err(ValidationError::InvalidEnvironmentSid(truncate(sid)));
    }
    Ok(())
}

/// Validate variable SID format
pub fn validate_variable_sid(sid: &str) -> Result<(), ValidationError> {
    if !VARIABLE_SID_REGEX.is_match(sid) {
        return Err(ValidationError::InvalidVariableSid(truncate(sid)));
    }
    Ok(())
}

/// Required keys that are absent from `params`, in `required` order
pub fn find_missing_params(params: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| !params.contains_key(**key))
        .map(|key| key.to_string())
        .collect()
}

/// Required keys that are present in `params` but not JSON strings
pub fn find_non_string_params(params: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| params.get(**key).is_some_and(|value| !value.is_string()))
        .map(|key| key.to_string())
        .collect()
}

/// Remove control characters except tab (which is allowed in HTTP headers)
pub fn strip_control_chars(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect()
}

// Limit error messages
fn truncate(id: &str) -> String {
    id.chars().take(50).collect()
}
