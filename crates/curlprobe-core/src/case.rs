//! Test case descriptors

use std::fmt;

use schemars::JsonSchema;
use serde::{Serialize, Serializer};

use crate::catalog::{Attack, EdgeKind};
use crate::request::RequestDescriptor;
use crate::status::describe_status;

/// Test category - determines the expected status and the pass rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Unmodified request
    Positive,
    /// One key deleted
    MissingField,
    /// String leaf made numeric or numeric leaf made textual
    TypeMismatch,
    /// Node set to null
    NullValue,
    /// String leaf emptied
    EmptyValue,
    /// String leaf replaced by an injection payload
    Security(Attack),
    /// Leaf replaced by a boundary-style value
    Edge(EdgeKind),
    /// Several nodes replaced at random; no fixed contract
    Fuzz,
    /// Content-Type removed or replaced
    HeaderVariant,
    /// Request sent with a different verb
    MethodVariant,
    /// First element of an array altered, or the array grown
    ArrayElement,
    /// Body inflated by one huge field or many extra fields
    OversizedPayload,
}

impl Category {
    /// Aggregation bucket: every `Security-*` tag shares one group, as does `Edge-*`.
    #[must_use]
    pub const fn group(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::MissingField => "Missing-Field",
            Self::TypeMismatch => "Type-Mismatch",
            Self::NullValue => "Null-Value",
            Self::EmptyValue => "Empty-Value",
            Self::Security(_) => "Security",
            Self::Edge(_) => "Edge",
            Self::Fuzz => "Fuzz",
            Self::HeaderVariant => "Header-Variant",
            Self::MethodVariant => "Method-Variant",
            Self::ArrayElement => "Array-Element",
            Self::OversizedPayload => "Oversized-Payload",
        }
    }

    #[must_use]
    pub const fn is_security(self) -> bool {
        matches!(self, Self::Security(_))
    }

    /// Fixed expectation for every category except Positive (caller-supplied).
    #[must_use]
    pub const fn default_expectation(self) -> ExpectedStatus {
        match self {
            Self::Positive => ExpectedStatus::Code(201),
            Self::Fuzz => ExpectedStatus::Varies,
            Self::HeaderVariant => ExpectedStatus::Code(415),
            Self::MethodVariant => ExpectedStatus::Code(405),
            Self::OversizedPayload => ExpectedStatus::Code(413),
            Self::MissingField
            | Self::TypeMismatch
            | Self::NullValue
            | Self::EmptyValue
            | Self::Security(_)
            | Self::Edge(_)
            | Self::ArrayElement => ExpectedStatus::Code(400),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Security(attack) => write!(f, "Security-{}", attack.name()),
            Self::Edge(kind) => write!(f, "Edge-{}", kind.name()),
            other => f.write_str(other.group()),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Status the target is expected to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedStatus {
    Code(u16),
    /// No single correct answer (fuzz).
    Varies,
}

impl ExpectedStatus {
    #[must_use]
    pub const fn code(self) -> Option<u16> {
        match self {
            Self::Code(c) => Some(c),
            Self::Varies => None,
        }
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(c) => f.write_str(&describe_status(*c)),
            Self::Varies => f.write_str("Varies"),
        }
    }
}

/// One generated request variant plus its expected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TestCase {
    #[schemars(with = "String")]
    pub category: Category,
    pub description: String,
    /// Independent deep copy of the base request with the mutation applied
    pub request: RequestDescriptor,
    pub expected_status: ExpectedStatus,
    /// Human-readable expectation, e.g. "400 Bad Request"
    pub expected_result: String,
}

impl TestCase {
    /// Build a case with the category's fixed expectation.
    #[must_use]
    pub fn new(
        category: Category,
        description: impl Into<String>,
        request: RequestDescriptor,
    ) -> Self {
        Self::with_expectation(
            category,
            description,
            request,
            category.default_expectation(),
        )
    }

    #[must_use]
    pub fn with_expectation(
        category: Category,
        description: impl Into<String>,
        request: RequestDescriptor,
        expected_status: ExpectedStatus,
    ) -> Self {
        Self {
            category,
            description: description.into(),
            request,
            expected_status,
            expected_result: expected_status.to_string(),
        }
    }
}
