//! Terminal rendering of a finished run

use std::fmt::Write as _;

use curlprobe_core::status::describe_status;
use curlprobe_core::{RunResult, Tally, Verdict, to_curl_command};

/// Observed status column: `201 Created`, or the transport error.
fn observed(verdict: &Verdict) -> String {
    match &verdict.outcome.error {
        Some(err) if verdict.outcome.is_transport_error() => err.clone(),
        _ => describe_status(verdict.outcome.status),
    }
}

/// `0` and `100` without decimals, everything else with one.
pub fn format_pct(pct: f64) -> String {
    if pct == 0.0 || pct == 100.0 {
        format!("{pct:.0}%")
    } else {
        format!("{pct:.1}%")
    }
}

/// One line on how the target treated injection payloads.
pub fn security_assessment(security: &Tally) -> String {
    if security.total == 0 {
        "not assessed (no string fields)".to_string()
    } else if security.errors == security.total {
        format!("not assessed ({} requests failed in transport)", security.total)
    } else if security.failed == 0 && security.errors == 0 {
        format!("all {} injection payloads rejected", security.total)
    } else {
        format!(
            "{} of {} injection payloads accepted",
            security.failed, security.total
        )
    }
}

/// Full report: per-case rows, totals, breakdown, and (verbose) reproductions.
pub fn render(result: &RunResult, verbose: bool) -> String {
    let mut out = String::new();
    let s = &result.summary;

    if let Some(err) = &result.error {
        let _ = writeln!(out, "Error: {err}");
        return out;
    }

    for (idx, v) in result.verdicts.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. [{:<8}] {:<20} expected {:<26} got {:<26} {}",
            idx + 1,
            v.status().to_string(),
            v.case.category.to_string(),
            v.case.expected_result,
            observed(v),
            v.case.description,
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total: {}  Passed: {}  Failed: {}  Errors: {}  Recorded: {}",
        s.total, s.passed, s.failed, s.errors, s.unasserted
    );
    let _ = writeln!(out, "Pass rate: {}", format_pct(s.pass_rate));
    let _ = writeln!(out, "Security: {}", security_assessment(&s.security));

    if !s.categories.is_empty() {
        let _ = writeln!(out, "\nBy category:");
        for (group, t) in &s.categories {
            let _ = writeln!(
                out,
                "  {group:<16} {}/{} passed",
                t.passed,
                t.total - t.unasserted
            );
        }
    }

    if let Some(w) = &s.warning {
        let _ = writeln!(out, "\nWARNING: {}", w.message);
    }

    if verbose {
        let failures: Vec<&Verdict> = result.failures().collect();
        if !failures.is_empty() {
            let _ = writeln!(out, "\nReproductions ({}):", failures.len());
            for v in failures {
                let _ = writeln!(out, "\n# {} - {}", v.case.category, v.case.description);
                let _ = writeln!(out, "{}", to_curl_command(&v.case.request));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use curlprobe_core::{
        Category, Method, Outcome, RequestDescriptor, ResponseBody, ResultAggregator, TestCase,
        VerdictPolicy,
    };

    fn verdict(category: Category, outcome: Outcome) -> Verdict {
        let req = RequestDescriptor::new(Method::Post, "http://localhost/objects");
        let case = TestCase::new(category, "a case", req);
        VerdictPolicy::default().verdict(case, outcome)
    }

    fn result(verdicts: Vec<Verdict>) -> RunResult {
        let mut agg = ResultAggregator::new();
        for v in verdicts {
            agg.record(v);
        }
        agg.into_result()
    }

    #[test]
    fn pct_formatting() {
        assert_eq!(format_pct(0.0), "0%");
        assert_eq!(format_pct(100.0), "100%");
        assert_eq!(format_pct(66.666), "66.7%");
    }

    #[test]
    fn rows_and_totals() {
        let r = result(vec![
            verdict(Category::Positive, Outcome::response(201, ResponseBody::Empty)),
            verdict(Category::MissingField, Outcome::response(200, ResponseBody::Empty)),
            verdict(Category::Fuzz, Outcome::response(500, ResponseBody::Empty)),
        ]);
        let text = render(&r, false);

        assert!(text.contains("[PASS    ] Positive"));
        assert!(text.contains("[FAIL    ] Missing-Field"));
        assert!(text.contains("[RECORDED] Fuzz"));
        assert!(text.contains("got 500 Internal Server Error"));
        assert!(text.contains("Total: 3  Passed: 1  Failed: 1  Errors: 0  Recorded: 1"));
        assert!(text.contains("Pass rate: 50%"));
        assert!(!text.contains("Reproductions"));
    }

    #[test]
    fn verbose_adds_curl_for_failures() {
        let r = result(vec![
            verdict(Category::Positive, Outcome::response(201, ResponseBody::Empty)),
            verdict(Category::NullValue, Outcome::response(201, ResponseBody::Empty)),
        ]);
        let text = render(&r, true);
        assert!(text.contains("Reproductions (1):"));
        assert!(text.contains("# Null-Value - a case"));
        assert!(text.contains("curl \\\n-X POST"));
    }

    #[test]
    fn transport_error_shown_in_place_of_status() {
        let r = result(vec![verdict(
            Category::Positive,
            Outcome::transport_error("Request timeout"),
        )]);
        let text = render(&r, false);
        assert!(text.contains("[ERROR   ]"));
        assert!(text.contains("got Request timeout"));
        assert!(text.contains("WARNING: target unreachable"));
    }

    #[test]
    fn aborted_run_renders_only_the_error() {
        let text = render(&RunResult::aborted("no target URL found in request text"), false);
        assert_eq!(text, "Error: no target URL found in request text\n");
    }

    #[test]
    fn security_lines() {
        let none = Tally::default();
        assert_eq!(security_assessment(&none), "not assessed (no string fields)");

        let clean = Tally {
            total: 6,
            passed: 6,
            ..Tally::default()
        };
        assert_eq!(security_assessment(&clean), "all 6 injection payloads rejected");

        let leaky = Tally {
            total: 6,
            passed: 4,
            failed: 2,
            ..Tally::default()
        };
        assert_eq!(
            security_assessment(&leaky),
            "2 of 6 injection payloads accepted"
        );
    }
}
