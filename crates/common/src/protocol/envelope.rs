use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a client error response: `{ "error": { "message", "moreInfo"? } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,

    /// Documentation URL describing the Function's API
    #[serde(rename = "moreInfo", default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, more_info: Option<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                more_info,
            },
        }
    }
}

/// Success/failure envelope: `{ "success": true, ...data }` or `{ "success": false, "error" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Envelope {
    /// Wrap `data` in a success envelope
    ///
    /// Object fields are merged into the envelope (a `success` or `error` field in
    /// `data` is dropped); any other non-null value is placed under `data`.
    pub fn success(data: Value) -> Self {
        let data = match data {
            Value::Null => Map::new(),
            Value::Object(mut fields) => {
                fields.remove("success");
                fields.remove("error");
                fields
            }
            other => {
                let mut fields = Map::new();
                fields.insert("data".to_string(), other);
                fields
            }
        };

        Self {
            success: true,
            error: None,
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            data: Map::new(),
        }
    }
}
