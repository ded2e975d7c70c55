//! Inflated bodies: one huge field, then many extra fields

use curlprobe_core::catalog::{EXTRA_FIELD_COUNT, OVERSIZED_FIELD, OVERSIZED_FIELD_LEN};
use curlprobe_core::{Category, ExpectedStatus, LeafPath, Payload, RequestDescriptor, TestCase};

use super::mutated;

/// Object payloads only.
pub(super) fn oversized(base: &RequestDescriptor, payload: &Payload, out: &mut Vec<TestCase>) {
    if payload.as_mapping().is_none() {
        return;
    }

    let large = Payload::string("X".repeat(OVERSIZED_FIELD_LEN));
    out.extend(mutated(
        base,
        Category::OversizedPayload,
        format!("Very large payload ({OVERSIZED_FIELD_LEN} byte {OVERSIZED_FIELD})"),
        |p| p.set(&LeafPath::keys([OVERSIZED_FIELD]), large),
    ));

    let many = mutated(
        base,
        Category::OversizedPayload,
        format!("Payload with {EXTRA_FIELD_COUNT} extra fields"),
        |p| {
            for i in 0..EXTRA_FIELD_COUNT {
                p.set(
                    &LeafPath::keys([format!("extraField{i}")]),
                    Payload::string(format!("value{i}")),
                )?;
            }
            Ok(())
        },
    );
    // Field count is a validation failure, not a size limit.
    out.extend(many.map(|case| {
        TestCase::with_expectation(
            case.category,
            case.description,
            case.request,
            ExpectedStatus::Code(400),
        )
    }));
}
