//! Request-level variants: Content-Type and verb

use curlprobe_core::catalog::{ALTERNATE_CONTENT_TYPE, WRONG_CONTENT_TYPE};
use curlprobe_core::{Category, Method, RequestDescriptor, TestCase};

/// Verbs tried by the method-variant generator.
const VARIANT_METHODS: [Method; 5] = [
    Method::Get,
    Method::Post,
    Method::Put,
    Method::Patch,
    Method::Delete,
];

/// Without Content-Type, then with an unrelated media type.
///
/// Only runs when the base request names a Content-Type (any casing).
pub(super) fn content_type_variants(base: &RequestDescriptor, out: &mut Vec<TestCase>) {
    let Some(key) = base.header_key("Content-Type").map(str::to_string) else {
        return;
    };

    let mut without = base.clone();
    without.headers.remove(&key);
    out.push(TestCase::new(
        Category::HeaderVariant,
        "Missing Content-Type header",
        without,
    ));

    let wrong_type = if base.content_type().is_some_and(is_wrong_content_type) {
        ALTERNATE_CONTENT_TYPE
    } else {
        WRONG_CONTENT_TYPE
    };
    let mut wrong = base.clone();
    wrong.headers.insert(key, wrong_type.to_string());
    out.push(TestCase::new(
        Category::HeaderVariant,
        format!("Wrong Content-Type ({wrong_type})"),
        wrong,
    ));
}

/// Media type part only: `Text/Plain; charset=utf-8` matches.
fn is_wrong_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(WRONG_CONTENT_TYPE))
}

/// Same request under every other common verb.
pub(super) fn method_variants(base: &RequestDescriptor, out: &mut Vec<TestCase>) {
    for method in VARIANT_METHODS.into_iter().filter(|m| *m != base.method) {
        let mut request = base.clone();
        request.method = method;
        out.push(TestCase::new(
            Category::MethodVariant,
            format!("Unsupported method {method}"),
            request,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RequestDescriptor {
        RequestDescriptor::new(Method::Put, "http://localhost/objects/7")
            .with_header("content-TYPE", "application/json")
            .with_header("Accept", "*/*")
    }

    #[test]
    fn content_type_removed_then_replaced() {
        let mut out = Vec::new();
        content_type_variants(&base(), &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].request.content_type(), None);
        assert_eq!(out[0].request.header("Accept"), Some("*/*"));
        assert_eq!(out[1].request.content_type(), Some("text/plain"));
        assert_eq!(out[1].request.headers.len(), 2);
        assert!(out.iter().all(|c| c.expected_result == "415 Unsupported Media Type"));
    }

    #[test]
    fn plain_text_request_gets_another_wrong_type() {
        let base = RequestDescriptor::new(Method::Post, "http://localhost/notes")
            .with_header("Content-Type", "Text/Plain; charset=utf-8");
        let mut out = Vec::new();
        content_type_variants(&base, &mut out);

        assert_eq!(out[1].request.content_type(), Some("application/xml"));
        assert_eq!(out[1].description, "Wrong Content-Type (application/xml)");
        assert_ne!(out[1].request, base);
    }

    #[test]
    fn no_content_type_no_variants() {
        let mut out = Vec::new();
        content_type_variants(
            &RequestDescriptor::new(Method::Post, "http://localhost/x"),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn method_variants_skip_original_verb() {
        let mut out = Vec::new();
        method_variants(&base(), &mut out);
        let verbs: Vec<String> = out.iter().map(|c| c.request.method.to_string()).collect();
        assert_eq!(verbs, vec!["GET", "POST", "PATCH", "DELETE"]);
        assert_eq!(out[0].expected_result, "405 Method Not Allowed");
    }
}
