//! Array fields: first-element edits and an inflated copy

use curlprobe_core::catalog::{
    ARRAY_ELEMENT_KEYS, ARRAY_GROWTH_FACTOR, ARRAY_GROWTH_LIMIT, TYPE_MISMATCH_NUMBER,
    TYPE_MISMATCH_STRING,
};
use curlprobe_core::payload::leaves;
use curlprobe_core::{Category, PathSegment, Payload, RequestDescriptor, TestCase};

use super::mutated;

/// For each non-empty array, in traversal order: drop the leading keys of an
/// object first element, swap the first element's type, then repeat the
/// whole array.
pub(super) fn array_elements(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    for (path, value) in leaves(payload) {
        let Payload::Sequence(items) = value else {
            continue;
        };
        let Some(first) = items.first() else {
            continue;
        };
        let first_path = path.child(PathSegment::Index(0));

        if let Some(element) = first.as_mapping() {
            for key in element.keys().take(ARRAY_ELEMENT_KEYS) {
                let key_path = first_path.child(PathSegment::Key(key.to_string()));
                out.extend(mutated(
                    base,
                    Category::ArrayElement,
                    format!("Missing {key} in {path} array element"),
                    |p| p.remove(&key_path).map(drop),
                ));
            }
        }

        let replacement = if first.is_string() {
            Some(Payload::int(TYPE_MISMATCH_NUMBER))
        } else if first.is_number() || first.as_mapping().is_some() {
            Some(Payload::string(TYPE_MISMATCH_STRING))
        } else {
            None
        };
        if let Some(replacement) = replacement {
            out.extend(mutated(
                base,
                Category::ArrayElement,
                format!(
                    "Wrong type for {path} array element ({} -> {})",
                    first.kind(),
                    replacement.kind()
                ),
                |p| p.set(&first_path, replacement),
            ));
        }

        if items.len() < ARRAY_GROWTH_LIMIT {
            let grown: Vec<Payload> = items
                .iter()
                .cycle()
                .take(items.len() * ARRAY_GROWTH_FACTOR)
                .cloned()
                .collect();
            out.extend(mutated(
                base,
                Category::ArrayElement,
                format!("Too many elements in {path} array ({})", grown.len()),
                |p| p.set(&path, Payload::Sequence(grown)),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curlprobe_core::{LeafPath, Method};
    use serde_json::json;

    fn run(payload: serde_json::Value) -> Vec<TestCase> {
        let req = RequestDescriptor::new(Method::Post, "http://localhost/orders")
            .with_payload(Payload::from(payload));
        let mut out = Vec::new();
        array_elements(&req, req.payload.as_ref().unwrap(), &mut out);
        out
    }

    fn body(case: &TestCase) -> serde_json::Value {
        serde_json::to_value(case.request.payload.as_ref().unwrap()).unwrap()
    }

    #[test]
    fn object_elements_lose_leading_keys_then_change_type() {
        let out = run(json!({"items": [{"sku": "a", "qty": 1, "note": "x"}, {"sku": "b"}]}));

        let descriptions: Vec<&str> = out.iter().map(|c| c.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Missing sku in items array element",
                "Missing qty in items array element",
                "Wrong type for items array element (object -> string)",
                "Too many elements in items array (100)",
            ]
        );
        assert_eq!(body(&out[0]), json!({"items": [{"qty": 1, "note": "x"}, {"sku": "b"}]}));
        assert_eq!(body(&out[2])["items"][0], json!("not_a_number"));
        assert!(out.iter().all(|c| c.expected_result == "400 Bad Request"));
    }

    #[test]
    fn scalar_elements_swap_type() {
        let out = run(json!({"tags": ["x", "y"], "scores": [3], "flags": [true]}));
        let tags: Vec<&str> = out.iter().map(|c| c.description.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "Wrong type for tags array element (string -> number)",
                "Too many elements in tags array (100)",
                "Wrong type for scores array element (number -> string)",
                "Too many elements in scores array (50)",
                "Too many elements in flags array (50)",
            ]
        );
        assert_eq!(body(&out[0])["tags"], json!([12345, "y"]));
    }

    #[test]
    fn grown_array_repeats_in_order() {
        let out = run(json!({"tags": [1, 2]}));
        let grown = out[1].request.payload.as_ref().unwrap().get(&LeafPath::keys(["tags"]));
        let Some(Payload::Sequence(items)) = grown else {
            panic!("tags must stay an array");
        };
        assert_eq!(items.len(), 100);
        assert_eq!(items[2], Payload::int(1));
        assert_eq!(items[99], Payload::int(2));
    }

    #[test]
    fn empty_and_large_arrays_are_left_alone() {
        assert!(run(json!({"none": [], "name": "x"})).is_empty());

        let big: Vec<u32> = (0..100).collect();
        let out = run(json!({"ids": big}));
        assert_eq!(out.len(), 1);
        assert!(out[0].description.starts_with("Wrong type"));
    }

    #[test]
    fn nested_arrays_are_found() {
        let out = run(json!({"order": {"lines": ["a"]}}));
        assert_eq!(out.len(), 2);
        assert_eq!(body(&out[0])["order"]["lines"], json!([12345]));
    }
}
