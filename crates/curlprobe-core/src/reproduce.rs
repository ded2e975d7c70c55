//! Reproduction rendering - turns any test case request back into `curl`

use crate::request::{Method, RequestDescriptor};

/// Runnable multi-line `curl` command sending exactly `request`.
///
/// The body is the compact JSON the executor sends. When a body is present
/// without a Content-Type header, an empty `Content-Type:` header stops curl
/// from adding its form-encoding default.
#[must_use]
pub fn to_curl_command(request: &RequestDescriptor) -> String {
    let mut parts = vec!["curl".to_string()];

    if request.method != Method::Get || request.payload.is_some() {
        parts.push(format!("-X {}", request.method));
    }
    parts.push(format!("--location {}", shell_quote(&request.url)));

    for (name, value) in &request.headers {
        parts.push(format!("--header {}", shell_quote(&format!("{name}: {value}"))));
    }

    if let Some(body) = request.body() {
        if request.content_type().is_none() {
            parts.push("--header 'Content-Type:'".to_string());
        }
        parts.push(format!("--data-raw {}", shell_quote(&body)));
    }

    parts.join(" \\\n")
}

/// One-line preview, e.g. `POST http://host/objects (1 header, 29 byte body)`.
#[must_use]
pub fn request_summary(request: &RequestDescriptor) -> String {
    let headers = match request.headers.len() {
        1 => "1 header".to_string(),
        n => format!("{n} headers"),
    };
    match request.body() {
        Some(body) => format!(
            "{} {} ({headers}, {} byte body)",
            request.method,
            request.url,
            body.len()
        ),
        None => format!("{} {} ({headers}, no body)", request.method, request.url),
    }
}

/// POSIX single-quote: `it's` becomes `'it'\''s'`.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;
    use serde_json::json;

    fn sample() -> RequestDescriptor {
        RequestDescriptor::new(Method::Post, "http://localhost:8080/objects")
            .with_header("Content-Type", "application/json")
            .with_payload(Payload::from(json!({"name": "Widget", "year": 2020})))
    }

    #[test]
    fn renders_multiline_command() {
        assert_eq!(
            to_curl_command(&sample()),
            "curl \\\n\
             -X POST \\\n\
             --location 'http://localhost:8080/objects' \\\n\
             --header 'Content-Type: application/json' \\\n\
             --data-raw '{\"name\":\"Widget\",\"year\":2020}'"
        );
    }

    #[test]
    fn get_without_body_omits_method() {
        let req = RequestDescriptor::new(Method::Get, "http://localhost/health");
        assert_eq!(
            to_curl_command(&req),
            "curl \\\n--location 'http://localhost/health'"
        );
    }

    #[test]
    fn missing_content_type_is_suppressed_explicitly() {
        let mut req = sample();
        req.headers.clear();
        let cmd = to_curl_command(&req);
        assert!(cmd.contains("--header 'Content-Type:' \\\n--data-raw"));
    }

    #[test]
    fn single_quotes_are_escaped() {
        let req = RequestDescriptor::new(Method::Post, "http://localhost/x")
            .with_header("Content-Type", "application/json")
            .with_payload(Payload::from(json!({"q": "'; DROP TABLE users; --"})));
        let cmd = to_curl_command(&req);
        assert!(cmd.ends_with(r#"--data-raw '{"q":"'\''; DROP TABLE users; --"}'"#));
    }

    #[test]
    fn summary_line() {
        insta::assert_snapshot!(
            request_summary(&sample()),
            @"POST http://localhost:8080/objects (1 header, 29 byte body)"
        );
        let bare = RequestDescriptor::new(Method::Get, "http://localhost/health");
        assert_eq!(
            request_summary(&bare),
            "GET http://localhost/health (0 headers, no body)"
        );
    }
}
