//! Leaf paths and path-addressed get/set/remove

use std::fmt;

use super::{Mapping, Payload};

/// One step into a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Location of a node inside a payload tree.
///
/// Displayed in dotted form: `data.year`, `items[0].name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LeafPath(Vec<PathSegment>);

impl LeafPath {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a key-only path, e.g. `LeafPath::keys(["data", "year"])`.
    #[must_use]
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(|k| PathSegment::Key(k.into())).collect())
    }

    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Whether `self` equals `prefix` or lies underneath it.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub(super) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(super) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for LeafPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSegment::Key(k) if i > 0 => write!(f, ".{k}")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("'{0}' does not exist")]
    Missing(String),
    #[error("'{0}' is not a container")]
    NotAContainer(String),
}

impl Payload {
    /// Resolve a path against this tree.
    #[must_use]
    pub fn get(&self, path: &LeafPath) -> Option<&Payload> {
        path.segments()
            .iter()
            .try_fold(self, |node, seg| step(node, seg))
    }

    /// Replace the node at `path`, inserting the final key if absent.
    ///
    /// Intermediate segments must already resolve to containers of the
    /// matching kind; nothing is created on the way down.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] and leaves the tree untouched when the path is
    /// empty or does not lead through existing containers.
    pub fn set(&mut self, path: &LeafPath, value: Payload) -> Result<(), PathError> {
        let (parent, last) = parent_mut(self, path)?;
        match (parent, last) {
            (Payload::Mapping(m), PathSegment::Key(k)) => {
                m.insert(k.clone(), value);
                Ok(())
            }
            (Payload::Sequence(items), PathSegment::Index(i)) => match items.get_mut(*i) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(PathError::Missing(path.to_string())),
            },
            _ => Err(PathError::NotAContainer(parent_label(path))),
        }
    }

    /// Remove and return the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] and leaves the tree untouched when the path is
    /// empty, the final node does not exist, or an intermediate node is not a
    /// container.
    pub fn remove(&mut self, path: &LeafPath) -> Result<Payload, PathError> {
        let (parent, last) = parent_mut(self, path)?;
        match (parent, last) {
            (Payload::Mapping(m), PathSegment::Key(k)) => m
                .remove(k)
                .ok_or_else(|| PathError::Missing(path.to_string())),
            (Payload::Sequence(items), PathSegment::Index(i)) if *i < items.len() => {
                Ok(items.remove(*i))
            }
            (Payload::Sequence(_), PathSegment::Index(_)) => {
                Err(PathError::Missing(path.to_string()))
            }
            _ => Err(PathError::NotAContainer(parent_label(path))),
        }
    }
}

fn step<'a>(node: &'a Payload, seg: &PathSegment) -> Option<&'a Payload> {
    match (node, seg) {
        (Payload::Mapping(m), PathSegment::Key(k)) => m.get(k),
        (Payload::Sequence(items), PathSegment::Index(i)) => items.get(*i),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut Payload, seg: &PathSegment) -> Option<&'a mut Payload> {
    match (node, seg) {
        (Payload::Mapping(m), PathSegment::Key(k)) => Mapping::get_mut(m, k),
        (Payload::Sequence(items), PathSegment::Index(i)) => items.get_mut(*i),
        _ => None,
    }
}

/// Walk to the parent of the final segment.
fn parent_mut<'a, 'p>(
    root: &'a mut Payload,
    path: &'p LeafPath,
) -> Result<(&'a mut Payload, &'p PathSegment), PathError> {
    let Some((last, init)) = path.segments().split_last() else {
        return Err(PathError::Empty);
    };

    let mut node = root;
    for (depth, seg) in init.iter().enumerate() {
        let here = LeafPath(init[..=depth].to_vec()).to_string();
        node = match step_mut(node, seg) {
            Some(next) => next,
            None => return Err(PathError::Missing(here)),
        };
        if matches!(node, Payload::Scalar(_)) {
            return Err(PathError::NotAContainer(here));
        }
    }
    Ok((node, last))
}

fn parent_label(path: &LeafPath) -> String {
    let segs = path.segments();
    if segs.len() <= 1 {
        "<root>".to_string()
    } else {
        LeafPath(segs[..segs.len() - 1].to_vec()).to_string()
    }
}
