//! Lambda host for Functions built on the runtime helpers
//!
//! This crate adapts API Gateway proxy events to [`FunctionEvent`]s, runs the
//! set-variable Function and converts its [`FunctionResponse`] back.

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use http::Method;
use runtime_helpers::{Context, FunctionEvent, FunctionResponse};
use runtime_helpers_common::constants::{CONTENT_TYPE_JSON, STATUS_BAD_REQUEST};
use runtime_helpers_common::{ErrorBody, decode_body, map_to_headers};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub mod error_handling;
pub mod handlers;

use error_handling::get_client_error_message;

const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Request bodies the host cannot turn into parameters
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Build a [`FunctionEvent`] from an API Gateway request
///
/// Parameters are the query string merged with the body; body fields win. JSON
/// bodies must be objects. Form bodies, or bodies without a content type, are
/// parsed as `application/x-www-form-urlencoded`.
pub fn build_function_event(request: &ApiGatewayProxyRequest) -> Result<FunctionEvent, RequestError> {
    let mut parameters = Map::new();
    for (name, value) in request.query_string_parameters.iter() {
        parameters.insert(name.to_string(), Value::String(value.to_string()));
    }

    if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
        let body = if request.is_base64_encoded {
            let bytes = decode_body(body).map_err(|e| RequestError::MalformedBody(e.to_string()))?;
            String::from_utf8(bytes).map_err(|e| RequestError::MalformedBody(e.to_string()))?
        } else {
            body.to_string()
        };

        let content_type = request
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(CONTENT_TYPE_FORM);

        if content_type.starts_with(CONTENT_TYPE_JSON) {
            match serde_json::from_str::<Value>(&body) {
                Ok(Value::Object(fields)) => parameters.extend(fields),
                Ok(_) => {
                    return Err(RequestError::MalformedBody(
                        "JSON body must be an object".to_string(),
                    ));
                }
                Err(e) => return Err(RequestError::MalformedBody(e.to_string())),
            }
        } else if content_type.starts_with(CONTENT_TYPE_FORM) {
            for (name, value) in url::form_urlencoded::parse(body.as_bytes()) {
                parameters.insert(name.into_owned(), Value::String(value.into_owned()));
            }
        } else {
            debug!("Ignoring body with content type {}", content_type);
        }
    }

    Ok(FunctionEvent {
        headers: request.headers.clone(),
        parameters,
    })
}

/// Convert a [`FunctionResponse`] to an API Gateway response
pub fn build_api_gateway_response(response: FunctionResponse) -> ApiGatewayProxyResponse {
    let body = response
        .has_body()
        .then(|| Body::Text(response.body_string()));

    ApiGatewayProxyResponse {
        status_code: i64::from(response.status_code),
        headers: map_to_headers(&response.headers),
        multi_value_headers: Default::default(),
        body,
        is_base64_encoded: false,
    }
}

/// A 400 response with an `{ "error": { "message" } }` body
fn bad_request(e: anyhow::Error) -> FunctionResponse {
    let body = ErrorBody::new(get_client_error_message(&e), None);
    FunctionResponse::json(
        STATUS_BAD_REQUEST,
        serde_json::to_value(body).unwrap_or_default(),
    )
}

/// Route one API Gateway request through the set-variable Function
pub async fn handle_request(ctx: &Context, request: &ApiGatewayProxyRequest) -> ApiGatewayProxyResponse {
    if request.http_method == Method::OPTIONS {
        debug!("Answering CORS preflight");
        return build_api_gateway_response(handlers::handle_preflight());
    }

    let response = match build_function_event(request) {
        Ok(event) => handlers::handle_set_variable(ctx, &event).await,
        Err(e) => handlers::with_cors(bad_request(anyhow::Error::new(e))),
    };

    if response.is_server_error() {
        warn!("Function returned {}", response.status_code);
    } else {
        debug!("Function returned {}", response.status_code);
    }
    build_api_gateway_response(response)
}
