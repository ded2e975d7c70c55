//! Run orchestration - extract, generate, execute, classify, aggregate
//!
//! Strictly sequential: the whole battery is generated before the first
//! request, then each case runs to completion before the next starts, with
//! a fixed pause in between.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use curlprobe_core::{
    Config, DryRunPlan, ExtractOptions, RequestDescriptor, ResultAggregator, RunResult, TestCase,
    VerdictPolicy, extract_with,
};

use crate::RunnerError;
use crate::executor::{DEFAULT_TIMEOUT, HttpExecutor, Transport};
use crate::mutate::{GenerationOptions, generate_cases};

/// Default pause between consecutive requests.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Drives one battery from raw request text to a [`RunResult`].
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    generation: GenerationOptions,
    extract: ExtractOptions,
    policy: VerdictPolicy,
    /// Added to the extracted request unless it already names them
    headers: BTreeMap<String, String>,
    timeout: Duration,
    delay: Duration,
    seed: Option<u64>,
}

impl Default for ProbeRunner {
    fn default() -> Self {
        Self {
            generation: GenerationOptions::default(),
            extract: ExtractOptions::default(),
            policy: VerdictPolicy::default(),
            headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
            seed: None,
        }
    }
}

impl ProbeRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            generation: GenerationOptions::from(config),
            extract: ExtractOptions {
                echo_fallback: config.echo_fallback,
            },
            policy: VerdictPolicy::default(),
            headers: config.headers.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            delay: Duration::from_millis(config.delay_ms),
            seed: config.seed,
        }
    }

    #[must_use]
    pub const fn with_expected_status(mut self, status: u16) -> Self {
        self.generation.expected_status = status;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract the base request and generate its battery.
    ///
    /// # Errors
    ///
    /// Returns error if the text names no target URL.
    pub fn prepare(&self, text: &str) -> Result<(RequestDescriptor, Vec<TestCase>), RunnerError> {
        let mut base = extract_with(text, &self.extract)?;
        for (name, value) in &self.headers {
            if base.header_key(name).is_none() {
                base.headers.insert(name.clone(), value.clone());
            }
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let cases = generate_cases(&base, &self.generation, &mut rng);
        Ok((base, cases))
    }

    /// Describe the battery without sending anything.
    ///
    /// # Errors
    ///
    /// Returns error if the text names no target URL.
    pub fn plan(&self, text: &str) -> Result<DryRunPlan, RunnerError> {
        let (base, cases) = self.prepare(text)?;
        Ok(DryRunPlan::from_cases(&base, &cases))
    }

    /// HTTP transport honoring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn http_executor(&self) -> Result<HttpExecutor, RunnerError> {
        HttpExecutor::new(self.timeout)
    }

    /// Run the battery over HTTP.
    ///
    /// A missing target is reported inside the returned [`RunResult`].
    ///
    /// # Errors
    ///
    /// Returns error only if the HTTP client cannot be built.
    pub fn run(&self, text: &str) -> Result<RunResult, RunnerError> {
        let executor = self.http_executor()?;
        Ok(self.run_with(text, &executor))
    }

    /// Run the battery through `transport`.
    ///
    /// Always completes: extraction failure yields an empty result carrying
    /// the error, and transport failures become failed verdicts.
    pub fn run_with<T: Transport + ?Sized>(&self, text: &str, transport: &T) -> RunResult {
        match self.prepare(text) {
            Ok((base, cases)) => self.run_prepared(&base, cases, transport),
            Err(e) => {
                warn!(error = %e, "nothing to run");
                RunResult::aborted(e.to_string())
            }
        }
    }

    /// Send an already generated battery, in order.
    pub fn run_prepared<T: Transport + ?Sized>(
        &self,
        base: &RequestDescriptor,
        cases: Vec<TestCase>,
        transport: &T,
    ) -> RunResult {
        let total = cases.len();
        info!(url = %base.url, method = %base.method, cases = total, "running battery");

        let mut aggregator = ResultAggregator::new();
        for (idx, case) in cases.into_iter().enumerate() {
            if idx > 0 && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            let outcome = transport.execute(&case);
            let verdict = self.policy.verdict(case, outcome);
            info!(
                "[{}/{total}] {} {} -> {}",
                idx + 1,
                verdict.status(),
                verdict.case.category,
                verdict.outcome.status
            );
            aggregator.record(verdict);
        }

        let result = aggregator.into_result();
        info!(
            passed = result.summary.passed,
            failed = result.summary.failed,
            errors = result.summary.errors,
            "battery complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curlprobe_core::{Category, Outcome, ResponseBody, VerdictStatus};
    use std::cell::RefCell;
    use std::time::Instant;

    const WIDGET: &str = r#"curl --location 'http://localhost:8080/objects' \
--header 'Content-Type: application/json' \
--data '{"name": "Widget", "year": 2020}'"#;

    /// Answers by category; remembers what it was asked to send.
    struct Scripted {
        positive: u16,
        negative: u16,
        header: u16,
        sent: RefCell<Vec<TestCase>>,
    }

    impl Scripted {
        fn new(positive: u16, negative: u16, header: u16) -> Self {
            Self {
                positive,
                negative,
                header,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Scripted {
        fn execute(&self, case: &TestCase) -> Outcome {
            self.sent.borrow_mut().push(case.clone());
            let status = match case.category {
                Category::Positive => self.positive,
                Category::HeaderVariant => self.header,
                _ => self.negative,
            };
            Outcome::response(status, ResponseBody::Empty)
        }
    }

    struct Down;

    impl Transport for Down {
        fn execute(&self, _case: &TestCase) -> Outcome {
            Outcome::transport_error("Connection error: refused")
        }
    }

    fn runner() -> ProbeRunner {
        ProbeRunner::new().with_seed(3).with_delay(Duration::ZERO)
    }

    #[test]
    fn well_behaved_service_passes_everything() {
        let transport = Scripted::new(201, 400, 415);
        let result = runner().run_with(WIDGET, &transport);

        assert!(result.error.is_none());
        assert_eq!(result.verdicts.len(), 26);
        assert_eq!(transport.sent.borrow().len(), 26);
        assert_eq!(result.summary.passed, 21);
        assert_eq!(result.summary.unasserted, 5);
        assert!(result.summary.all_passed());
        assert_eq!(result.summary.security.total, 6);
        assert_eq!(result.verdicts[0].case.category, Category::Positive);
    }

    #[test]
    fn lenient_service_fails_negative_cases() {
        let transport = Scripted::new(201, 201, 201);
        let result = runner().run_with(WIDGET, &transport);

        assert_eq!(result.summary.passed, 1);
        assert_eq!(result.summary.failed, 20);
        assert_eq!(result.summary.security.failed, 6);
        assert!(!result.summary.all_passed());
    }

    #[test]
    fn positive_accepts_200_when_201_expected() {
        let transport = Scripted::new(200, 400, 415);
        let result = runner().run_with(WIDGET, &transport);
        assert!(result.verdicts[0].passed);
    }

    #[test]
    fn missing_target_runs_nothing() {
        let transport = Scripted::new(201, 400, 415);
        let result = runner().run_with("curl -X POST --data '{\"a\": 1}'", &transport);

        assert!(result.verdicts.is_empty());
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(result.error.as_deref(), Some("no target URL found in request text"));
        assert_eq!(result.summary.total, 0);
    }

    #[test]
    fn unreachable_target_fails_all_but_fuzz() {
        let result = runner().run_with(WIDGET, &Down);

        assert_eq!(result.summary.errors, 26);
        assert_eq!(result.summary.passed, 0);
        for v in &result.verdicts {
            assert!(!v.passed);
            assert_eq!(v.status(), VerdictStatus::Error);
            assert_eq!(v.asserted, v.case.category != Category::Fuzz);
        }
    }

    #[test]
    fn real_executor_against_closed_port() {
        let result = runner()
            .with_timeout(Duration::from_secs(2))
            .run_with("curl 'http://127.0.0.1:1/x' -H 'Content-Type: application/json'", &{
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(2))
                    .no_proxy()
                    .build()
                    .unwrap();
                HttpExecutor::from_client(client)
            });
        assert_eq!(result.verdicts.len(), 3);
        assert!(result.verdicts.iter().all(|v| v.outcome.status == 0));
    }

    #[test]
    fn config_headers_fill_gaps_only() {
        let config = Config {
            headers: BTreeMap::from([
                ("Authorization".to_string(), "Bearer cfg".to_string()),
                ("content-type".to_string(), "text/xml".to_string()),
            ]),
            seed: Some(1),
            ..Config::default()
        };
        let (base, _) = ProbeRunner::from_config(&config).prepare(WIDGET).unwrap();

        assert_eq!(base.header("Authorization"), Some("Bearer cfg"));
        assert_eq!(base.content_type(), Some("application/json"));
        assert_eq!(base.headers.len(), 2);
    }

    #[test]
    fn config_toggles_and_expectation_flow_through() {
        let mut config = Config {
            expected_status: 202,
            seed: Some(1),
            ..Config::default()
        };
        config.categories.fuzz = false;
        config.categories.method_variant = true;

        let (_, cases) = ProbeRunner::from_config(&config).prepare(WIDGET).unwrap();
        assert_eq!(cases.len(), 26 - 5 + 4);
        assert_eq!(cases[0].expected_result, "202 Accepted");
    }

    #[test]
    fn plan_matches_generated_battery() {
        let plan = runner().plan(WIDGET).unwrap();
        let (_, cases) = runner().prepare(WIDGET).unwrap();
        assert_eq!(plan.total_cases, cases.len() as u64);
        assert_eq!(plan.target, "POST http://localhost:8080/objects");
    }

    #[test]
    fn plan_without_target_is_an_error() {
        assert!(matches!(
            runner().plan("no url here"),
            Err(RunnerError::Extract(_))
        ));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = runner().prepare(WIDGET).unwrap().1;
        let b = runner().prepare(WIDGET).unwrap().1;
        assert_eq!(a, b);
    }

    #[test]
    fn prepared_battery_runs_as_generated() {
        let runner = runner();
        let (base, mut cases) = runner.prepare(WIDGET).unwrap();
        cases.truncate(4);
        let expected: Vec<String> = cases.iter().map(|c| c.description.clone()).collect();

        let transport = Scripted::new(201, 400, 415);
        let result = runner.run_prepared(&base, cases, &transport);

        let sent: Vec<String> =
            transport.sent.borrow().iter().map(|c| c.description.clone()).collect();
        assert_eq!(sent, expected);
        assert_eq!(result.summary.total, 4);
        assert!(result.error.is_none());
    }

    #[test]
    fn requests_are_spaced_by_delay() {
        let transport = Scripted::new(201, 400, 415);
        let start = Instant::now();
        let result = ProbeRunner::new()
            .with_delay(Duration::from_millis(20))
            .run_with("curl 'http://localhost/x' -H 'Content-Type: application/json'", &transport);
        assert_eq!(result.verdicts.len(), 3);
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
