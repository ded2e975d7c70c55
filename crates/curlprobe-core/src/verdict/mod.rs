//! Verdict module - per-case judgment and classification policy

mod policy;

use std::fmt;

use schemars::JsonSchema;
use serde::Serialize;

use crate::case::TestCase;
use crate::outcome::Outcome;

pub use policy::VerdictPolicy;

/// A test case, what came back, and the judgment.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Verdict {
    pub case: TestCase,
    pub outcome: Outcome,
    pub passed: bool,
    /// False for record-only categories; `passed` is then a soft pass.
    pub asserted: bool,
}

impl Verdict {
    #[must_use]
    pub fn status(&self) -> VerdictStatus {
        if self.outcome.is_transport_error() {
            VerdictStatus::Error
        } else if !self.asserted {
            VerdictStatus::Recorded
        } else if self.passed {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        }
    }
}

/// Display label of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Pass,
    Fail,
    /// Transport failure, no status observed
    Error,
    /// Outcome kept, nothing asserted
    Recorded,
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Error => write!(f, "ERROR"),
            Self::Recorded => write!(f, "RECORDED"),
        }
    }
}
