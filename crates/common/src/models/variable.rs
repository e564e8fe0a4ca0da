use serde::{Deserialize, Serialize};

/// A key-value environment variable owned by a remote environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable SID (`ZV` + 32 hex characters)
    pub sid: String,

    /// Variable name, unique within its environment
    pub key: String,

    pub value: String,

    pub service_sid: String,

    pub environment_sid: String,
}

impl Variable {
    /// Create a new variable entry
    pub fn new(
        sid: impl Into<String>,
        service_sid: impl Into<String>,
        environment_sid: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            sid: sid.into(),
            key: key.into(),
            value: value.into(),
            service_sid: service_sid.into(),
            environment_sid: environment_sid.into(),
        }
    }
}
