//! Mutation generators - base request to an ordered test case battery
//!
//! Every case starts from a deep clone of the base request and applies one
//! path-addressed edit (fuzz may apply several). The battery is produced in
//! a fixed category order with Positive first; within a category, cases
//! follow payload traversal order.

mod arrays;
mod edge;
mod fields;
mod fuzz;
mod headers;
mod oversize;
mod security;

use rand::Rng;
use tracing::{debug, warn};

use curlprobe_core::{
    Category, CategoryToggles, Config, ExpectedStatus, PathError, Payload, RequestDescriptor,
    TestCase,
};

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Expected status of the Positive case
    pub expected_status: u16,
    pub categories: CategoryToggles,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            expected_status: 201,
            categories: CategoryToggles::default(),
        }
    }
}

impl From<&Config> for GenerationOptions {
    fn from(config: &Config) -> Self {
        Self {
            expected_status: config.expected_status,
            categories: config.categories,
        }
    }
}

/// Build the full battery for `base`.
///
/// Without a payload only Positive, Header-Variant and (when enabled)
/// Method-Variant cases are produced.
pub fn generate_cases<R: Rng + ?Sized>(
    base: &RequestDescriptor,
    options: &GenerationOptions,
    rng: &mut R,
) -> Vec<TestCase> {
    let toggles = &options.categories;
    let mut cases = vec![TestCase::with_expectation(
        Category::Positive,
        "Valid request with original payload",
        base.clone(),
        ExpectedStatus::Code(options.expected_status),
    )];

    if let Some(payload) = &base.payload {
        if toggles.missing_field {
            fields::missing_field(base, payload, &mut cases);
        }
        if toggles.type_mismatch {
            fields::type_mismatch(base, payload, &mut cases);
        }
        if toggles.null_value {
            fields::null_value(base, payload, &mut cases);
        }
        if toggles.empty_value {
            fields::empty_value(base, payload, &mut cases);
        }
        if toggles.security {
            security::injections(base, payload, &mut cases);
        }
        if toggles.edge {
            edge::boundaries(base, payload, &mut cases);
        }
        if toggles.fuzz {
            fuzz::passes(base, payload, rng, &mut cases);
        }
        if toggles.array_element {
            arrays::array_elements(base, payload, &mut cases);
        }
        if toggles.oversized_payload {
            oversize::oversized(base, payload, &mut cases);
        }
    }

    if toggles.header_variant {
        headers::content_type_variants(base, &mut cases);
    }
    if toggles.method_variant {
        headers::method_variants(base, &mut cases);
    }

    debug!(count = cases.len(), "test cases generated");
    cases
}

/// Clone `base`, apply `edit` to the clone's payload, and wrap the result.
///
/// A failed edit is logged and yields `None`; the battery simply skips
/// that one case.
pub(crate) fn mutated<F>(
    base: &RequestDescriptor,
    category: Category,
    description: String,
    edit: F,
) -> Option<TestCase>
where
    F: FnOnce(&mut Payload) -> Result<(), PathError>,
{
    let mut request = base.clone();
    let Some(payload) = request.payload.as_mut() else {
        warn!(%category, "no payload to mutate, case skipped");
        return None;
    };
    match edit(payload) {
        Ok(()) => Some(TestCase::new(category, description, request)),
        Err(e) => {
            warn!(%category, %description, error = %e, "mutation failed, case skipped");
            None
        }
    }
}
