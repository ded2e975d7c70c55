//! Boundary-style values on string and number leaves

use curlprobe_core::payload::leaves;
use curlprobe_core::{Category, EdgeKind, Payload, RequestDescriptor, TestCase};

use super::mutated;

pub(super) fn boundaries(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    for (path, value) in leaves(payload) {
        let kinds: &[EdgeKind] = if value.is_string() {
            &EdgeKind::FOR_STRINGS
        } else if value.is_number() {
            &EdgeKind::FOR_NUMBERS
        } else {
            &[]
        };
        for &kind in kinds {
            out.extend(mutated(
                base,
                Category::Edge(kind),
                format!("{} in {path}", kind.describe()),
                |p| p.set(&path, kind.value()),
            ));
        }
    }
}
