//! Fixed mutation tables: attack strings, edge values, fuzz pool
//!
//! Read-only data. Generators pick from these; nothing mutates them.

use crate::payload::Payload;

/// Injection attack families applied to string leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attack {
    Xss,
    Sql,
    NoSql,
    Ldap,
    Command,
    PathTraversal,
}

impl Attack {
    pub const ALL: [Self; 6] = [
        Self::Xss,
        Self::Sql,
        Self::NoSql,
        Self::Ldap,
        Self::Command,
        Self::PathTraversal,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xss => "XSS",
            Self::Sql => "SQL",
            Self::NoSql => "NoSQL",
            Self::Ldap => "LDAP",
            Self::Command => "Command",
            Self::PathTraversal => "Path",
        }
    }

    #[must_use]
    pub const fn payload(self) -> &'static str {
        match self {
            Self::Xss => r#"<script>alert("xss")</script>"#,
            Self::Sql => "'; DROP TABLE users; --",
            Self::NoSql => r#"{"$gt": ""}"#,
            Self::Ldap => "*)(uid=*))(|(uid=*",
            Self::Command => "; rm -rf /",
            Self::PathTraversal => "../../../etc/passwd",
        }
    }
}

/// Boundary-style values; string kinds apply to string leaves, the rest to numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Long,
    Special,
    Unicode,
    Large,
    Negative,
}

/// Length of the oversized string edge value.
pub const LONG_STRING_LEN: usize = 1000;

/// 2^53 - 1, the largest integer a double represents exactly.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

pub const LARGE_NEGATIVE: i64 = -999_999;

pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+{}[]|\:";'<>?,.`~"#;

pub const UNICODE_TEXT: &str = "🚀💻🔥🎯📊✅❌🧪";

impl EdgeKind {
    pub const FOR_STRINGS: [Self; 3] = [Self::Long, Self::Special, Self::Unicode];
    pub const FOR_NUMBERS: [Self; 2] = [Self::Large, Self::Negative];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Long => "Long",
            Self::Special => "Special",
            Self::Unicode => "Unicode",
            Self::Large => "Large",
            Self::Negative => "Negative",
        }
    }

    #[must_use]
    pub fn value(self) -> Payload {
        match self {
            Self::Long => Payload::string("a".repeat(LONG_STRING_LEN)),
            Self::Special => Payload::string(SPECIAL_CHARACTERS),
            Self::Unicode => Payload::string(UNICODE_TEXT),
            Self::Large => Payload::int(MAX_SAFE_INTEGER),
            Self::Negative => Payload::int(LARGE_NEGATIVE),
        }
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Long => "Very long string",
            Self::Special => "Special characters",
            Self::Unicode => "Unicode characters",
            Self::Large => "Maximum safe integer",
            Self::Negative => "Large negative number",
        }
    }
}

/// Constant replacing string leaves in type-mismatch cases.
pub const TYPE_MISMATCH_NUMBER: i64 = 12345;

/// Constant replacing numeric leaves in type-mismatch cases.
pub const TYPE_MISMATCH_STRING: &str = "not_a_number";

/// Number of independent fuzz passes per payload.
pub const FUZZ_PASSES: usize = 5;

/// Per-node replacement probability within one fuzz pass.
pub const FUZZ_PROBABILITY: f64 = 0.4;

/// Pool size of [`fuzz_value`].
pub const FUZZ_POOL_LEN: usize = 9;

/// Value `idx` of the fuzz pool (`idx < FUZZ_POOL_LEN`, wraps otherwise).
#[must_use]
pub fn fuzz_value(idx: usize) -> Payload {
    match idx % FUZZ_POOL_LEN {
        0 => Payload::null(),
        1 => Payload::empty_sequence(),
        2 => Payload::empty_mapping(),
        3 => Payload::string("null"),
        4 => Payload::string("undefined"),
        5 => Payload::string("[]"),
        6 => Payload::string("{}"),
        7 => Payload::string("true"),
        _ => Payload::string("false"),
    }
}

/// Unrelated media type used by the header-variant generator.
pub const WRONG_CONTENT_TYPE: &str = "text/plain";

/// Used instead when the request already sends [`WRONG_CONTENT_TYPE`].
pub const ALTERNATE_CONTENT_TYPE: &str = "application/xml";

/// Arrays shorter than this are repeated [`ARRAY_GROWTH_FACTOR`] times.
pub const ARRAY_GROWTH_LIMIT: usize = 100;
pub const ARRAY_GROWTH_FACTOR: usize = 50;

/// Keys of an object element removed one at a time, from the front.
pub const ARRAY_ELEMENT_KEYS: usize = 2;

/// Field added to make a 1 MB body.
pub const OVERSIZED_FIELD: &str = "largeField";
pub const OVERSIZED_FIELD_LEN: usize = 1_000_000;

/// Number of `extraField{i}` keys added by the many-fields case.
pub const EXTRA_FIELD_COUNT: usize = 1000;

/// Demo endpoints that echo whatever they receive.
///
/// When the data argument of a request aimed at one of these cannot be
/// parsed, the extractor substitutes [`echo_fallback_payload`] so the example
/// stays runnable. Nothing else uses this table.
pub const ECHO_FALLBACK_TARGETS: &[&str] = &["api.restful-api.dev/objects"];

/// Fixed object accepted by the restful-api.dev echo service.
#[must_use]
pub fn echo_fallback_payload() -> Payload {
    Payload::from(serde_json::json!({
        "name": "Apple MacBook Pro 16",
        "data": {
            "year": 2019,
            "price": 1849.99,
            "CPU model": "Intel Core i9",
            "Hard disk size": "1 TB"
        }
    }))
}
