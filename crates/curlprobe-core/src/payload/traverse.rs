//! Deterministic payload walk shared by every generator

use super::{LeafPath, PathSegment, Payload};

/// Visit every mapping entry under `node`, depth-first, in insertion order.
///
/// Each entry is visited before its children. Only mapping values are
/// descended into; sequences and scalars are visited as whole nodes. A
/// non-mapping root yields nothing.
pub fn traverse<'a, F>(node: &'a Payload, mut visit: F)
where
    F: FnMut(&LeafPath, &'a Payload),
{
    let mut path = LeafPath::root();
    walk(node, &mut path, &mut visit);
}

fn walk<'a, F>(node: &'a Payload, path: &mut LeafPath, visit: &mut F)
where
    F: FnMut(&LeafPath, &'a Payload),
{
    let Payload::Mapping(mapping) = node else {
        return;
    };
    for (key, value) in mapping.iter() {
        path.push(PathSegment::Key(key.to_string()));
        visit(path, value);
        walk(value, path, visit);
        path.pop();
    }
}

/// Collect the traversal sequence as owned paths.
#[must_use]
pub fn leaves(node: &Payload) -> Vec<(LeafPath, &Payload)> {
    let mut out = Vec::new();
    traverse(node, |path, value| out.push((path.clone(), value)));
    out
}
