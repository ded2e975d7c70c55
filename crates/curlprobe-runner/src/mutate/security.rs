//! Injection payloads on string leaves

use curlprobe_core::payload::leaves;
use curlprobe_core::{Attack, Category, Payload, RequestDescriptor, TestCase};

use super::mutated;

/// One case per string leaf and attack family.
pub(super) fn injections(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    for (path, _) in leaves(payload).into_iter().filter(|(_, v)| v.is_string()) {
        for attack in Attack::ALL {
            out.extend(mutated(
                base,
                Category::Security(attack),
                format!("{} injection in {path}", attack.name()),
                |p| p.set(&path, Payload::string(attack.payload())),
            ));
        }
    }
}
