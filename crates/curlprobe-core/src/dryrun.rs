//! Dry run plan types and request validation
//!
//! Describes what a run *would* send without touching the network.
//! Used to preview a battery and to sanity-check the pasted request.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;

use crate::case::TestCase;
use crate::request::RequestDescriptor;

// ── Plan types ──

/// Complete dry run plan: planned cases, per-group counts and request checks.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DryRunPlan {
    /// "METHOD url" of the base request
    pub target: String,
    /// Total requests that would be sent
    pub total_cases: u64,
    /// Category group -> planned cases
    pub categories: BTreeMap<String, u64>,
    pub cases: Vec<PlannedCase>,
    pub validations: Vec<Validation>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlannedCase {
    /// Category tag, e.g. "Security-XSS"
    pub category: String,
    pub description: String,
    pub expected_result: String,
}

/// A validation check result.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Validation {
    pub check: String,
    pub status: ValidationStatus,
    pub message: String,
}

/// Status of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Ok,
    Warning,
    Error,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl Validation {
    fn new(check: &str, status: ValidationStatus, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            status,
            message: message.into(),
        }
    }
}

// ── Request validation ──

/// Patterns that suggest a placeholder value rather than a real credential.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-token",
    "your_token",
    "YOUR_TOKEN",
    "your-api-key",
    "YOUR_API_KEY",
    "CHANGEME",
    "changeme",
    "placeholder",
    "xxx",
    "XXX",
    "replace-me",
    "REPLACE_ME",
    "{{",
];

/// Check the extracted request for things that would make the battery noisy.
#[must_use]
pub fn validate_request(request: &RequestDescriptor) -> Vec<Validation> {
    let mut checks = Vec::new();

    match request.scheme() {
        Some("http" | "https") => checks.push(Validation::new(
            "url",
            ValidationStatus::Ok,
            format!("url: {}", request.url),
        )),
        Some(scheme) => checks.push(Validation::new(
            "url",
            ValidationStatus::Error,
            format!("url: unsupported scheme '{scheme}'"),
        )),
        None => checks.push(Validation::new(
            "url",
            ValidationStatus::Warning,
            format!("url: {} (missing http:// or https:// prefix)", request.url),
        )),
    }

    let mut header_issues = Vec::new();
    for (key, value) in &request.headers {
        if value.contains('<') && value.contains('>') {
            header_issues.push(format!("{key}: contains '<...>' placeholder"));
        }
        if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| value.contains(*p)) {
            header_issues.push(format!("{key}: contains '{pattern}', may be a placeholder"));
        }
    }
    if header_issues.is_empty() {
        checks.push(Validation::new(
            "headers",
            ValidationStatus::Ok,
            format!("headers: {} present", request.headers.len()),
        ));
    } else {
        checks.extend(
            header_issues
                .into_iter()
                .map(|issue| Validation::new("headers", ValidationStatus::Warning, issue)),
        );
    }

    if request.content_type().is_none() {
        checks.push(Validation::new(
            "content_type",
            ValidationStatus::Warning,
            "content type: none, header variants skipped",
        ));
    }

    match &request.payload {
        Some(payload) if payload.as_mapping().is_some() => checks.push(Validation::new(
            "payload",
            ValidationStatus::Ok,
            "payload: JSON object",
        )),
        Some(payload) => checks.push(Validation::new(
            "payload",
            ValidationStatus::Warning,
            format!("payload: JSON {}, field mutations skipped", payload.kind()),
        )),
        None => checks.push(Validation::new(
            "payload",
            ValidationStatus::Warning,
            "payload: none, only positive and header cases",
        )),
    }

    checks
}

// ── Plan construction ──

impl DryRunPlan {
    /// Plan for `cases` generated from `base`.
    #[must_use]
    pub fn from_cases(base: &RequestDescriptor, cases: &[TestCase]) -> Self {
        let mut categories: BTreeMap<String, u64> = BTreeMap::new();
        for case in cases {
            *categories
                .entry(case.category.group().to_string())
                .or_default() += 1;
        }

        Self {
            target: format!("{} {}", base.method, base.url),
            total_cases: cases.len() as u64,
            categories,
            cases: cases
                .iter()
                .map(|c| PlannedCase {
                    category: c.category.to_string(),
                    description: c.description.clone(),
                    expected_result: c.expected_result.clone(),
                })
                .collect(),
            validations: validate_request(base),
        }
    }

    // ── Display helpers ──

    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Dry run: {} ({} cases planned)\n",
            self.target, self.total_cases
        ));

        let counts: Vec<String> = self
            .categories
            .iter()
            .map(|(group, n)| format!("{n} {group}"))
            .collect();
        lines.push(format!("Categories: {}", counts.join(", ")));
        lines.push(String::new());

        for (idx, case) in self.cases.iter().enumerate() {
            lines.push(format!(
                "  {:>3}. [{}] {} -> {}",
                idx + 1,
                case.category,
                case.description,
                case.expected_result
            ));
        }
        lines.push(String::new());

        lines.push("Request validation:".into());
        for v in &self.validations {
            lines.push(format!("  [{}] {}", v.status, v.message));
        }

        lines.join("\n")
    }

    /// Returns true if any validation has Error status.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.status == ValidationStatus::Error)
    }

    /// Returns true if any validation has Warning status.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.status == ValidationStatus::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Category;
    use crate::catalog::Attack;
    use crate::payload::Payload;
    use crate::request::Method;
    use serde_json::json;

    fn base() -> RequestDescriptor {
        RequestDescriptor::new(Method::Post, "http://localhost:8080/objects")
            .with_header("Content-Type", "application/json")
            .with_payload(Payload::from(json!({"name": "Widget"})))
    }

    fn request_checks(request: &RequestDescriptor, check: &str) -> Vec<Validation> {
        validate_request(request)
            .into_iter()
            .filter(|c| c.check == check)
            .collect()
    }

    #[test]
    fn validate_clean_request() {
        let checks = validate_request(&base());
        assert!(checks.iter().all(|c| c.status == ValidationStatus::Ok));
    }

    #[test]
    fn validate_placeholder_angle_brackets() {
        let req = base().with_header("Authorization", "Bearer <your-token-here>");
        let checks = request_checks(&req, "headers");
        assert!(
            checks.iter().any(|c| c.status == ValidationStatus::Warning),
            "Should warn about angle-bracket placeholder"
        );
    }

    #[test]
    fn validate_template_variable() {
        let req = base().with_header("X-API-Key", "{{api_key}}");
        let checks = request_checks(&req, "headers");
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].status, ValidationStatus::Warning);
    }

    #[test]
    fn validate_url_without_scheme() {
        let req = RequestDescriptor::new(Method::Get, "localhost:8080/x");
        let url = request_checks(&req, "url");
        assert_eq!(url[0].status, ValidationStatus::Warning);
    }

    #[test]
    fn validate_embedded_url_is_not_a_scheme() {
        let req = RequestDescriptor::new(Method::Get, "localhost:8080/cb?u=http://x");
        let url = request_checks(&req, "url");
        assert_eq!(url[0].status, ValidationStatus::Warning);
    }

    #[test]
    fn validate_foreign_scheme_is_error() {
        let req = base();
        let req = RequestDescriptor {
            url: "ftp://files.local/upload".into(),
            ..req
        };
        let url = request_checks(&req, "url");
        assert_eq!(url[0].status, ValidationStatus::Error);
        assert!(DryRunPlan::from_cases(&req, &[]).has_errors());
    }

    #[test]
    fn validate_missing_payload_and_content_type() {
        let req = RequestDescriptor::new(Method::Get, "http://localhost/x");
        assert_eq!(
            request_checks(&req, "payload")[0].status,
            ValidationStatus::Warning
        );
        assert_eq!(request_checks(&req, "content_type").len(), 1);
    }

    #[test]
    fn plan_counts_by_group() {
        let req = base();
        let cases = vec![
            TestCase::new(Category::Positive, "Valid request", req.clone()),
            TestCase::new(Category::Security(Attack::Xss), "XSS in name", req.clone()),
            TestCase::new(Category::Security(Attack::Sql), "SQL in name", req.clone()),
        ];
        let plan = DryRunPlan::from_cases(&req, &cases);

        assert_eq!(plan.total_cases, 3);
        assert_eq!(plan.categories["Security"], 2);
        assert_eq!(plan.categories["Positive"], 1);
        assert_eq!(plan.cases[1].category, "Security-XSS");
        assert!(!plan.has_errors());
        assert!(!plan.has_warnings());
    }

    #[test]
    fn plan_terminal_output() {
        let req = base();
        let cases = vec![
            TestCase::new(Category::Positive, "Valid request", req.clone()),
            TestCase::new(Category::HeaderVariant, "Wrong Content-Type", req.clone()),
        ];
        let text = DryRunPlan::from_cases(&req, &cases).to_terminal();

        assert!(text.contains("Dry run: POST http://localhost:8080/objects (2 cases planned)"));
        assert!(text.contains("Categories: 1 Header-Variant, 1 Positive"));
        assert!(text.contains("  2. [Header-Variant] Wrong Content-Type -> 415 Unsupported Media Type"));
        assert!(text.contains("[OK] url: http://localhost:8080/objects"));
    }
}
