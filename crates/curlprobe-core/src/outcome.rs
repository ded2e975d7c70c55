//! Observed result of executing one test case

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response body as received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// Non-JSON body, possibly truncated
    Text(String),
}

impl ResponseBody {
    /// Parse as JSON when possible, otherwise keep the raw text.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// What came back from the target (or from the transport, on failure).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Outcome {
    /// Observed status; 0 when no response arrived
    pub status: u16,
    #[serde(default, skip_serializing_if = "ResponseBody::is_empty")]
    pub body: ResponseBody,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl Outcome {
    #[must_use]
    pub fn response(status: u16, body: ResponseBody) -> Self {
        Self {
            status,
            body,
            ..Self::default()
        }
    }

    /// Status 0 with an error message; nothing reached the target or came back.
    #[must_use]
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub const fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        self.status == 0
    }
}
