//! Per-invocation request context
//!
//! A [`Context`] carries the named configuration strings a Function runs with and
//! the management API client used by the environment helpers.

use runtime_helpers_common::constants::{DEBUG_FLAG_KEY, DOMAIN_NAME_KEY};
use runtime_helpers_common::{HelperError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::client::ServerlessApi;

#[derive(Clone)]
pub struct Context {
    vars: HashMap<String, String>,
    client: Arc<dyn ServerlessApi>,
}

impl fmt::Debug for Context {
    // Configuration values may hold secrets; only the keys are shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.vars.keys().collect();
        keys.sort();
        f.debug_struct("Context").field("vars", &keys).finish_non_exhaustive()
    }
}

impl Context {
    /// Create an empty context around a management client
    pub fn new(client: Arc<dyn ServerlessApi>) -> Self {
        Self {
            vars: HashMap::new(),
            client,
        }
    }

    /// Snapshot the process environment into a new context
    pub fn from_env(client: Arc<dyn ServerlessApi>) -> Self {
        Self {
            vars: std::env::vars().collect(),
            client,
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// A configuration value; empty strings are treated as unset
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// A configuration value that must be set
    pub fn require_var(&self, key: &str) -> Result<&str> {
        self.var(key)
            .ok_or_else(|| HelperError::MissingConfig(key.to_string()))
    }

    /// Domain the current request was served from
    pub fn domain_name(&self) -> Option<&str> {
        self.var(DOMAIN_NAME_KEY)
    }

    /// Whether the debug flag is on: any non-empty value enables it
    pub fn is_debug(&self) -> bool {
        self.var(DEBUG_FLAG_KEY).is_some()
    }

    pub fn client(&self) -> &dyn ServerlessApi {
        self.client.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryServerless;

    fn context() -> Context {
        Context::new(Arc::new(InMemoryServerless::new()))
    }

    #[test]
    fn test_empty_value_is_unset() {
        let ctx = context().with_var("AUTH_USERNAME", "");

        assert!(ctx.var("AUTH_USERNAME").is_none());
        assert!(matches!(
            ctx.require_var("AUTH_USERNAME"),
            Err(HelperError::MissingConfig(ref key)) if key == "AUTH_USERNAME"
        ));
    }

    #[test]
    fn test_debug_flag() {
        assert!(!context().is_debug());
        assert!(context().with_var(DEBUG_FLAG_KEY, "true").is_debug());
        assert!(context().with_var(DEBUG_FLAG_KEY, "1").is_debug());
        assert!(context().with_var(DEBUG_FLAG_KEY, "false").is_debug());
        assert!(context().with_var(DEBUG_FLAG_KEY, "0").is_debug());
        assert!(!context().with_var(DEBUG_FLAG_KEY, "").is_debug());
    }

    #[test]
    fn test_debug_output_hides_values() {
        let ctx = context()
            .with_var("AUTH_PASSCODE", "hunter2")
            .with_var(DOMAIN_NAME_KEY, "example.twil.io");
        let debug = format!("{:?}", ctx);

        assert!(debug.contains("AUTH_PASSCODE"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(ctx.domain_name(), Some("example.twil.io"));
    }
}
