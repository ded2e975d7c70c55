//! Random multi-field fuzzing

use rand::Rng;

use curlprobe_core::catalog::{FUZZ_PASSES, FUZZ_POOL_LEN, FUZZ_PROBABILITY, fuzz_value};
use curlprobe_core::payload::leaves;
use curlprobe_core::{Category, LeafPath, Payload, RequestDescriptor, TestCase};

use super::mutated;

/// `FUZZ_PASSES` independent passes over the payload.
///
/// Within a pass each node is replaced with probability `FUZZ_PROBABILITY`;
/// the subtree under a replaced node is not visited in that pass.
pub(super) fn passes<R: Rng + ?Sized>(
    base: &RequestDescriptor,
    payload: &Payload,
    rng: &mut R,
    out: &mut Vec<TestCase>,
) {
    let nodes = leaves(payload);
    for pass in 1..=FUZZ_PASSES {
        let mut replaced: Vec<(LeafPath, Payload)> = Vec::new();
        for (path, _) in &nodes {
            if replaced.iter().any(|(r, _)| path.starts_with(r)) {
                continue;
            }
            if rng.gen_bool(FUZZ_PROBABILITY) {
                replaced.push((path.clone(), fuzz_value(rng.gen_range(0..FUZZ_POOL_LEN))));
            }
        }

        let description = if replaced.is_empty() {
            format!("Random fuzz test #{pass} (no fields changed)")
        } else {
            let fields: Vec<String> = replaced.iter().map(|(p, _)| p.to_string()).collect();
            format!("Random fuzz test #{pass} ({})", fields.join(", "))
        };

        out.extend(mutated(base, Category::Fuzz, description, |p| {
            replaced
                .into_iter()
                .try_for_each(|(path, value)| p.set(&path, value))
        }));
    }
}
