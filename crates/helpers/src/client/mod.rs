//! Management API access
//!
//! [`ServerlessApi`] is the seam between the helpers and the platform's management
//! API. [`TwilioServerlessClient`] talks to the REST API; [`InMemoryServerless`]
//! serves local development and tests.

mod memory;
mod twilio;

use async_trait::async_trait;
use runtime_helpers_common::validation::ValidationError;
use runtime_helpers_common::{Environment, HelperError, Service, Variable};
use thiserror::Error;

pub use memory::{CallCounts, InMemoryServerless};
pub use twilio::{ClientConfig, TwilioServerlessClient};

/// Errors raised while talking to the management API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serverless API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    InvalidSid(#[from] ValidationError),

    #[error("Serverless API unavailable: {0}")]
    Unavailable(String),
}

impl From<ApiError> for HelperError {
    fn from(e: ApiError) -> Self {
        HelperError::RemoteApi(e.to_string())
    }
}

/// Operations the helpers need from the platform's management API
///
/// Lists are returned in the order the API reports them.
#[async_trait]
pub trait ServerlessApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>, ApiError>;

    async fn list_environments(&self, service_sid: &str) -> Result<Vec<Environment>, ApiError>;

    async fn list_variables(
        &self,
        service_sid: &str,
        environment_sid: &str,
    ) -> Result<Vec<Variable>, ApiError>;

    async fn create_variable(
        &self,
        service_sid: &str,
        environment_sid: &str,
        key: &str,
        value: &str,
    ) -> Result<Variable, ApiError>;

    async fn update_variable(
        &self,
        service_sid: &str,
        environment_sid: &str,
        variable_sid: &str,
        value: &str,
    ) -> Result<Variable, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime_helpers_common::validation::validate_service_sid;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: "The requested resource was not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Serverless API returned 404: The requested resource was not found"
        );
    }

    #[test]
    fn test_api_error_into_helper_error() {
        let err: ApiError = validate_service_sid("bogus").unwrap_err().into();
        let helper: HelperError = err.into();

        assert!(matches!(helper, HelperError::RemoteApi(ref msg) if msg.contains("bogus")));
    }
}
