//! Field-level mutations: deletion, type swap, null, empty

use curlprobe_core::catalog::{TYPE_MISMATCH_NUMBER, TYPE_MISMATCH_STRING};
use curlprobe_core::payload::leaves;
use curlprobe_core::{Category, Payload, RequestDescriptor, TestCase};

use super::mutated;

/// Deepest level Missing-Field reaches.
const MISSING_FIELD_MAX_DEPTH: usize = 2;

/// Delete each key at depth 1, then each key at depth 2.
pub(super) fn missing_field(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    let all = leaves(payload);
    for depth in 1..=MISSING_FIELD_MAX_DEPTH {
        for (path, _) in all.iter().filter(|(p, _)| p.depth() == depth) {
            out.extend(mutated(
                base,
                Category::MissingField,
                format!("Missing field: {path}"),
                |p| p.remove(path).map(drop),
            ));
        }
    }
}

/// Strings become a number, numbers become a string.
pub(super) fn type_mismatch(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    for (path, value) in leaves(payload) {
        let (replacement, change) = if value.is_string() {
            (Payload::int(TYPE_MISMATCH_NUMBER), "string -> number")
        } else if value.is_number() {
            (Payload::string(TYPE_MISMATCH_STRING), "number -> string")
        } else {
            continue;
        };
        out.extend(mutated(
            base,
            Category::TypeMismatch,
            format!("Type mismatch: {path} ({change})"),
            |p| p.set(&path, replacement),
        ));
    }
}

/// Every node, containers included, set to null.
pub(super) fn null_value(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    for (path, value) in leaves(payload) {
        out.extend(mutated(
            base,
            Category::NullValue,
            format!("Null value: {path} (was {})", value.kind()),
            |p| p.set(&path, Payload::null()),
        ));
    }
}

pub(super) fn empty_value(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    for (path, _) in leaves(payload).into_iter().filter(|(_, v)| v.is_string()) {
        out.extend(mutated(
            base,
            Category::EmptyValue,
            format!("Empty value: {path}"),
            |p| p.set(&path, Payload::string("")),
        ));
    }
}
