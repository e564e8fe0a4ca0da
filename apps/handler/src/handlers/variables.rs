//! The set-variable Function
//!
//! Request parameters:
//! - `key`, `value`: the variable to write (required, strings)
//! - `override`: whether an existing variable may be changed (optional, default `true`)
//!
//! Requires HTTP Basic authentication against `AUTH_USERNAME` / `AUTH_PASSCODE`.

use anyhow::Context as _;
use runtime_helpers::log::TracingSink;
use runtime_helpers::{
    Context, CorsOptions, FunctionEvent, FunctionResponse, HelperError, Logger, MutableResponse,
    create_cors_response, enable_cors, extract_params, failure, get_current_environment,
    is_authenticated, set_environment_variable, success,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::error_handling::get_client_error_message;

const LOG_LABEL: &str = "set-variable";
const OVERRIDE_PARAM: &str = "override";
const REQUIRED_PARAMS: [&str; 2] = ["key", "value"];

/// CORS headers sent with every response
pub fn cors_options() -> CorsOptions {
    CorsOptions::any_origin().with_headers(["Content-Type", "Authorization"])
}

pub fn with_cors(mut response: FunctionResponse) -> FunctionResponse {
    enable_cors(&mut response, &cors_options());
    response
}

/// Answer an `OPTIONS` request
pub fn handle_preflight() -> FunctionResponse {
    create_cors_response(&cors_options())
}

/// Run the Function; every outcome is a response carrying CORS headers
pub async fn handle_set_variable(ctx: &Context, event: &FunctionEvent) -> FunctionResponse {
    let logger = Logger::with_sink(ctx, LOG_LABEL, TracingSink);

    let response = match set_variable(ctx, event, &logger).await {
        Ok(response) => response,
        Err(e) => {
            logger.error("Request failed");
            failure(get_client_error_message(&e))
        }
    };

    with_cors(response)
}

async fn set_variable(
    ctx: &Context,
    event: &FunctionEvent,
    logger: &Logger<TracingSink>,
) -> anyhow::Result<FunctionResponse> {
    match is_authenticated(ctx, event) {
        Ok(true) => {}
        Ok(false) | Err(HelperError::MissingHeader(_)) => {
            logger.warn("Rejected request with missing or invalid credentials");
            return Ok(unauthorized());
        }
        Err(e) => return Err(e).context("Failed to check credentials"),
    }

    let params = match extract_params(event, &REQUIRED_PARAMS, None) {
        Ok(params) => params,
        Err(invalid) => {
            logger.warn(invalid.message());
            return Ok(invalid.into_response());
        }
    };
    let key = params.get("key").and_then(Value::as_str).unwrap_or_default();
    let value = params.get("value").and_then(Value::as_str).unwrap_or_default();
    let allow_override = parse_override(params.get(OVERRIDE_PARAM));

    let environment = get_current_environment(ctx)
        .await
        .context("Failed to look up the current environment")?;
    let Some(environment) = environment else {
        logger.error("No deployed environment matches the current domain");
        return Ok(failure("No deployed environment found for this domain"));
    };

    let changed = set_environment_variable(ctx, &environment, key, value, allow_override).await;
    debug!(
        "set '{}' in {} (override: {}, changed: {})",
        key, environment.sid, allow_override, changed
    );
    logger.info(&format!(
        "Variable '{}' {}",
        key,
        if changed { "written" } else { "left unchanged" }
    ));

    Ok(success(json!({ "key": key, "changed": changed })))
}

/// `false`, `"false"` and `"0"` disable overriding; anything else enables it
fn parse_override(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => !(text.eq_ignore_ascii_case("false") || text == "0"),
        Some(Value::Number(number)) => number.as_i64() != Some(0),
        Some(_) => true,
    }
}

fn unauthorized() -> FunctionResponse {
    let mut response = FunctionResponse::new();
    response.set_status_code(401);
    response.append_header("WWW-Authenticate", "Basic realm=\"set-variable\"");
    response.set_body(Value::String("Unauthorized".to_string()));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        assert!(parse_override(None));
        assert!(parse_override(Some(&json!(null))));
        assert!(parse_override(Some(&json!(true))));
        assert!(parse_override(Some(&json!("yes"))));
        assert!(!parse_override(Some(&json!(false))));
        assert!(!parse_override(Some(&json!("False"))));
        assert!(!parse_override(Some(&json!("0"))));
        assert!(!parse_override(Some(&json!(0))));
    }

    #[test]
    fn test_preflight() {
        let res = handle_preflight();

        assert_eq!(res.status_code, 200);
        assert_eq!(res.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(res.header("Access-Control-Allow-Methods"), Some("POST, OPTIONS"));
        assert_eq!(
            res.header("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
    }

    #[test]
    fn test_unauthorized() {
        let res = unauthorized();
        assert_eq!(res.status_code, 401);
        assert!(res.header("www-authenticate").is_some());
        assert_eq!(res.body_string(), "Unauthorized");
    }
}
