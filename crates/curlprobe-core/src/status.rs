//! HTTP status helpers and status distribution pattern detection
//!
//! A battery where nearly every response shares one status usually says more
//! about the setup (bad token, wrong URL, throttling) than about validation.
//! [`detect_pattern`] flags those runs so the report can say so up front.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;

/// Reason phrase for the status codes the engine commonly reports.
#[must_use]
pub const fn status_text(status: u16) -> &'static str {
    match status {
        0 => "No Response",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// `"<code> <reason>"`, e.g. `"415 Unsupported Media Type"`.
#[must_use]
pub fn describe_status(status: u16) -> String {
    format!("{status} {}", status_text(status))
}

/// Kind of setup issue suggested by the status distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusWarningKind {
    /// Nearly all responses are 401/403
    AuthenticationIssue,
    /// Nearly all responses are 429
    RateLimited,
    /// Nearly all responses are 404
    EndpointNotFound,
    /// Nearly all requests failed in transport
    Unreachable,
}

impl std::fmt::Display for StatusWarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationIssue => write!(f, "authentication may be invalid"),
            Self::RateLimited => write!(f, "rate limited, consider raising delay_ms"),
            Self::EndpointNotFound => write!(f, "endpoint not found, check the target URL"),
            Self::Unreachable => write!(f, "target unreachable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct StatusWarning {
    pub kind: StatusWarningKind,
    pub message: String,
}

/// Share of responses, in tenths, a single pattern must reach to be reported.
const DOMINANCE_TENTHS: u64 = 9;

/// Detect a dominant status pattern (at least 90% of responses).
#[must_use]
pub fn detect_pattern(distribution: &BTreeMap<u16, u64>) -> Option<StatusWarning> {
    let total: u64 = distribution.values().sum();
    if total == 0 {
        return None;
    }
    let threshold = (total * DOMINANCE_TENTHS).div_ceil(10);
    let count = |codes: &[u16]| -> u64 {
        codes
            .iter()
            .filter_map(|c| distribution.get(c))
            .sum::<u64>()
    };

    let candidates = [
        (StatusWarningKind::Unreachable, count(&[0])),
        (StatusWarningKind::AuthenticationIssue, count(&[401, 403])),
        (StatusWarningKind::RateLimited, count(&[429])),
        (StatusWarningKind::EndpointNotFound, count(&[404])),
    ];
    candidates
        .into_iter()
        .find(|&(_, n)| n >= threshold)
        .map(|(kind, n)| StatusWarning {
            kind,
            message: format!("{kind} ({n}/{total} responses)"),
        })
}
