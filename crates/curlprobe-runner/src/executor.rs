//! Sequential HTTP executor
//!
//! Sends one test case, waits for the answer within a bounded time, and
//! reports what came back as an [`Outcome`]. Never retries. Transport
//! failures become status 0 outcomes instead of errors so the run always
//! completes.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_LENGTH, HeaderName, HeaderValue};
use tracing::{debug, warn};

use curlprobe_core::{Outcome, ResponseBody, TestCase, url_scheme};

use crate::RunnerError;

/// Response bodies that are not JSON are cut at this many bytes.
pub const MAX_BODY_BYTES: usize = 4096;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Sends a test case and reports the outcome.
pub trait Transport {
    fn execute(&self, case: &TestCase) -> Outcome;
}

/// Production transport on a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::blocking::Client,
}

impl HttpExecutor {
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, RunnerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunnerError::Http(e.to_string()))?;
        Ok(Self::from_client(client))
    }

    /// Wrap a preconfigured client (proxy settings, TLS roots).
    #[must_use]
    pub const fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpExecutor {
    fn execute(&self, case: &TestCase) -> Outcome {
        let request = &case.request;

        let method = match reqwest::Method::from_bytes(request.method.as_str().as_bytes()) {
            Ok(m) => m,
            Err(e) => return Outcome::transport_error(e.to_string()),
        };

        let mut req = self.client.request(method, with_scheme(&request.url));
        for (name, value) in &request.headers {
            // Invalid names/values would fail the whole send; they never reach the target anyway.
            if HeaderName::from_bytes(name.as_bytes()).is_ok() && HeaderValue::from_str(value).is_ok()
            {
                req = req.header(name, value);
            } else {
                warn!(header = %name, "invalid header skipped");
            }
        }
        // Raw bytes: `.json()` would add a Content-Type the header variants must not carry.
        if let Some(body) = request.body() {
            req = req.header(CONTENT_LENGTH, body.len()).body(body);
        }

        let start = Instant::now();
        let resp = match req.send() {
            Ok(resp) => resp,
            Err(e) => {
                let outcome = Outcome::transport_error(describe_error(&e));
                return outcome.with_latency(elapsed_ms(start));
            }
        };

        let status = resp.status().as_u16();
        let headers: BTreeMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = match resp.text() {
            Ok(text) => body_from_text(text),
            Err(e) => {
                debug!(error = %e, "response body unreadable");
                ResponseBody::Empty
            }
        };
        let latency = elapsed_ms(start);
        debug!(%status, latency_ms = latency, case = %case.description, "response");

        Outcome::response(status, body)
            .with_headers(headers)
            .with_latency(latency)
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection error: {e}")
    } else {
        e.to_string()
    }
}

/// `localhost:8080/x` is sent as `http://localhost:8080/x`, as curl does.
fn with_scheme(url: &str) -> String {
    if url_scheme(url).is_some() {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// JSON when it parses, otherwise text truncated on a char boundary.
fn body_from_text(text: String) -> ResponseBody {
    match ResponseBody::from_text(text) {
        ResponseBody::Text(t) => ResponseBody::Text(truncate(t)),
        other => other,
    }
}

fn truncate(text: String) -> String {
    if text.len() <= MAX_BODY_BYTES {
        return text;
    }
    let mut end = MAX_BODY_BYTES;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…({} bytes total)", &text[..end], text.len())
}
