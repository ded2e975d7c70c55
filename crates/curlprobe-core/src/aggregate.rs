//! Result aggregation - ordered verdicts plus pass/fail tallies

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;

use crate::status::{StatusWarning, detect_pattern};
use crate::verdict::Verdict;

/// Pass/fail counts for a set of verdicts.
///
/// Every verdict lands in exactly one bucket: transport errors first, then
/// record-only outcomes, then passed or failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Tally {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    /// Transport failures (status 0)
    pub errors: u64,
    /// Record-only outcomes that reached the target
    pub unasserted: u64,
}

impl Tally {
    fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        if verdict.outcome.is_transport_error() {
            self.errors += 1;
        } else if !verdict.asserted {
            self.unasserted += 1;
        } else if verdict.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Percentage of asserted verdicts that passed (0.0 when nothing was asserted).
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let asserted = self.total - self.unasserted;
        if asserted == 0 {
            0.0
        } else {
            self.passed as f64 * 100.0 / asserted as f64
        }
    }
}

/// Serializable summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RunSummary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub errors: u64,
    pub unasserted: u64,
    /// Percentage, 0.0-100.0
    pub pass_rate: f64,
    /// Security-* cases only
    pub security: Tally,
    /// Category group -> tally
    pub categories: BTreeMap<String, Tally>,
    /// Observed status -> count (0 = transport failure)
    pub status_distribution: BTreeMap<u16, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<StatusWarning>,
}

impl RunSummary {
    /// True when no asserted case failed and no request errored.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Everything a reporter needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RunResult {
    /// Generation order, Positive first
    pub verdicts: Vec<Verdict>,
    pub summary: RunSummary,
    /// Terminal error that stopped the run before any request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    /// Empty, well-formed result for a run that could not start.
    #[must_use]
    pub fn aborted(error: impl Into<String>) -> Self {
        Self {
            verdicts: Vec::new(),
            summary: ResultAggregator::new().summary(),
            error: Some(error.into()),
        }
    }

    /// Verdicts that failed (asserted failures and transport errors).
    pub fn failures(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.passed)
    }
}

/// Collects verdicts in execution order.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    verdicts: Vec<Verdict>,
    overall: Tally,
    security: Tally,
    categories: BTreeMap<String, Tally>,
    status_distribution: BTreeMap<u16, u64>,
}

impl ResultAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: Verdict) {
        self.overall.record(&verdict);
        if verdict.case.category.is_security() {
            self.security.record(&verdict);
        }
        self.categories
            .entry(verdict.case.category.group().to_string())
            .or_default()
            .record(&verdict);
        *self
            .status_distribution
            .entry(verdict.outcome.status)
            .or_default() += 1;
        self.verdicts.push(verdict);
    }

    #[must_use]
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.overall.total,
            passed: self.overall.passed,
            failed: self.overall.failed,
            errors: self.overall.errors,
            unasserted: self.overall.unasserted,
            pass_rate: self.overall.pass_rate(),
            security: self.security,
            categories: self.categories.clone(),
            status_distribution: self.status_distribution.clone(),
            warning: detect_pattern(&self.status_distribution),
        }
    }

    #[must_use]
    pub fn into_result(self) -> RunResult {
        let summary = self.summary();
        RunResult {
            verdicts: self.verdicts,
            summary,
            error: None,
        }
    }
}
