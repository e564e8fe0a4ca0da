//! Error sanitization for client responses
//!
//! Full error chains are logged; clients only see messages that carry no details
//! about credentials, the management API or the deployment.

use tracing::error;

use crate::RequestError;

/// Log the full error and return a generic message
///
/// # Examples
///
/// ```
/// use anyhow::anyhow;
/// use runtime_helpers_handler::error_handling::sanitize_error;
///
/// let err = anyhow!("Serverless API returned 401: Authenticate");
/// assert_eq!(sanitize_error(&err), "Internal server error");
/// ```
pub fn sanitize_error(e: &anyhow::Error) -> String {
    error!("Internal error: {:#}", e);
    "Internal server error".to_string()
}

/// Whether the error describes the caller's request rather than the host
pub fn is_safe_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<RequestError>().is_some()
}

/// The error's own message if it is safe to show, a generic one otherwise
pub fn get_client_error_message(e: &anyhow::Error) -> String {
    if is_safe_error(e) {
        error!("Client error: {}", e);
        e.to_string()
    } else {
        sanitize_error(e)
    }
}
