//! Verdict policy - decides pass/fail for one case from its outcome

use super::Verdict;
use crate::case::{Category, ExpectedStatus, TestCase};
use crate::outcome::Outcome;

/// Classification rules, by category.
#[derive(Debug, Clone)]
pub struct VerdictPolicy {
    /// Statuses a positive case accepts besides its expected one
    pub success_codes: Vec<u16>,
    /// Lowest status counted as a rejection of malformed input
    pub rejection_floor: u16,
    /// The one status a header variant accepts
    pub header_variant_status: u16,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            success_codes: vec![200, 201],
            rejection_floor: 400,
            header_variant_status: 415,
        }
    }
}

impl VerdictPolicy {
    /// Whether the category's outcome is asserted at all.
    #[must_use]
    pub const fn asserts(category: Category) -> bool {
        !matches!(category, Category::Fuzz)
    }

    /// Pass/fail for one case.
    ///
    /// Transport failures (status 0) fail every category. For record-only
    /// categories any received response counts as a soft pass.
    #[must_use]
    pub fn judge(&self, case: &TestCase, outcome: &Outcome) -> bool {
        if outcome.is_transport_error() {
            return false;
        }
        let status = outcome.status;
        match case.category {
            Category::Positive => {
                case.expected_status == ExpectedStatus::Code(status)
                    || self.success_codes.contains(&status)
            }
            Category::HeaderVariant => status == self.header_variant_status,
            Category::Fuzz => true,
            Category::MissingField
            | Category::TypeMismatch
            | Category::NullValue
            | Category::EmptyValue
            | Category::Security(_)
            | Category::Edge(_)
            | Category::MethodVariant
            | Category::ArrayElement
            | Category::OversizedPayload => status >= self.rejection_floor,
        }
    }

    #[must_use]
    pub fn verdict(&self, case: TestCase, outcome: Outcome) -> Verdict {
        let passed = self.judge(&case, &outcome);
        Verdict {
            asserted: Self::asserts(case.category),
            case,
            outcome,
            passed,
        }
    }
}
