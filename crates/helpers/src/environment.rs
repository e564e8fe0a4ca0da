//! Current environment lookup and environment variable management
//!
//! All calls go through the [`ServerlessApi`](crate::client::ServerlessApi) held by
//! the [`Context`].

use runtime_helpers_common::constants::LOCALHOST_PREFIX;
use runtime_helpers_common::{Environment, Variable};
use tracing::{debug, error, warn};

use crate::client::ApiError;
use crate::context::Context;

/// Find the deployed environment serving the current domain
///
/// Returns `None` when running locally (the domain starts with `localhost`), when
/// no domain is configured, or when no environment of any service has the
/// current domain. Services and environments are searched in the order the API
/// lists them; the first match wins.
pub async fn get_current_environment(ctx: &Context) -> Result<Option<Environment>, ApiError> {
    let Some(domain) = ctx.domain_name() else {
        debug!("No domain name configured; skipping environment lookup");
        return Ok(None);
    };

    if domain.starts_with(LOCALHOST_PREFIX) {
        debug!("Running on {}; no deployed environment", domain);
        return Ok(None);
    }

    let client = ctx.client();
    for service in client.list_services().await? {
        let environments = client.list_environments(&service.sid).await?;
        if let Some(environment) = environments.into_iter().find(|e| e.domain_name == domain) {
            debug!("Current environment is {} ({})", environment.sid, domain);
            return Ok(Some(environment));
        }
    }

    debug!("No environment found for domain {}", domain);
    Ok(None)
}

/// List every variable of an environment
pub async fn get_environment_variables(
    ctx: &Context,
    environment: &Environment,
) -> Result<Vec<Variable>, ApiError> {
    ctx.client()
        .list_variables(&environment.service_sid, &environment.sid)
        .await
}

/// Find a variable by key
pub async fn get_environment_variable(
    ctx: &Context,
    environment: &Environment,
    key: &str,
) -> Result<Option<Variable>, ApiError> {
    let variables = get_environment_variables(ctx, environment).await?;
    Ok(variables.into_iter().find(|v| v.key == key))
}

/// Create or update a variable
///
/// Returns `true` if the variable was created or its value changed. An existing
/// variable is only updated when `allow_override` is set and the value differs.
/// Remote failures are logged and reported as `false`.
pub async fn set_environment_variable(
    ctx: &Context,
    environment: &Environment,
    key: &str,
    value: &str,
    allow_override: bool,
) -> bool {
    match try_set_environment_variable(ctx, environment, key, value, allow_override).await {
        Ok(changed) => changed,
        Err(e) => {
            error!("Failed to set environment variable '{}': {}", key, e);
            false
        }
    }
}

async fn try_set_environment_variable(
    ctx: &Context,
    environment: &Environment,
    key: &str,
    value: &str,
    allow_override: bool,
) -> Result<bool, ApiError> {
    let client = ctx.client();

    match get_environment_variable(ctx, environment, key).await? {
        Some(existing) if existing.value == value => {
            warn!("Variable '{}' already has this value; nothing to do", key);
            Ok(false)
        }
        Some(_) if !allow_override => {
            warn!("Variable '{}' already exists and override is disabled", key);
            Ok(false)
        }
        Some(existing) => {
            client
                .update_variable(&environment.service_sid, &environment.sid, &existing.sid, value)
                .await?;
            debug!("Updated variable '{}' in {}", key, environment.sid);
            Ok(true)
        }
        None => {
            client
                .create_variable(&environment.service_sid, &environment.sid, key, value)
                .await?;
            debug!("Created variable '{}' in {}", key, environment.sid);
            Ok(true)
        }
    }
}
