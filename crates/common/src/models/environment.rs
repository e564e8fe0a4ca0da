use serde::{Deserialize, Serialize};

/// A deployed service as reported by the management API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service SID (`ZS` + 32 hex characters)
    pub sid: String,

    /// Unique, URL-safe name of the service
    #[serde(default)]
    pub unique_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

impl Service {
    /// Create a new service descriptor
    pub fn new(sid: impl Into<String>, unique_name: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            unique_name: unique_name.into(),
            friendly_name: None,
        }
    }
}

/// A remote deployment environment (e.g. production, staging) of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment SID (`ZE` + 32 hex characters)
    pub sid: String,

    /// SID of the service that owns this environment
    pub service_sid: String,

    /// Domain name requests to this environment are served from
    #[serde(default)]
    pub domain_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_suffix: Option<String>,
}

impl Environment {
    /// Create a new environment descriptor
    pub fn new(
        sid: impl Into<String>,
        service_sid: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self {
            sid: sid.into(),
            service_sid: service_sid.into(),
            domain_name: domain_name.into(),
            unique_name: None,
            domain_suffix: None,
        }
    }

    /// Attach the environment's unique name
    pub fn with_unique_name(mut self, unique_name: impl Into<String>) -> Self {
        self.unique_name = Some(unique_name.into());
        self
    }
}
