use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Index sequence locating a node from the document root.
///
/// An empty path addresses the root itself. Paths order nodes in document
/// order: a node sorts before its own descendants, and siblings sort by
/// index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Path(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    /// Same path with the last index replaced.
    pub fn with_last(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        if let Some(last) = indices.last_mut() {
            *last = index;
        }
        Path(indices)
    }

    /// True when `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// True when `self` is `other` or an ancestor of it.
    pub fn is_ancestor_or_self_of(&self, other: &Path) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    pub fn is_sibling_of(&self, other: &Path) -> bool {
        self != other && !self.0.is_empty() && self.parent() == other.parent()
    }

    pub fn next_sibling(&self) -> Option<Path> {
        self.last().map(|last| self.with_last(last + 1))
    }

    pub fn previous_sibling(&self) -> Option<Path> {
        match self.last() {
            Some(last) if last > 0 => Some(self.with_last(last - 1)),
            _ => None,
        }
    }

    /// Indices of `self` below `ancestor`, or `None` if not a descendant.
    pub fn relative_to(&self, ancestor: &Path) -> Option<&[usize]> {
        if ancestor.is_ancestor_or_self_of(self) {
            Some(&self.0[ancestor.len()..])
        } else {
            None
        }
    }

    /// Path of `self` joined with the indices of `tail`.
    pub fn join(&self, tail: &[usize]) -> Path {
        let mut indices = self.0.clone();
        indices.extend_from_slice(tail);
        Path(indices)
    }

    /// Adjusts `self` for a node inserted at `at`. Paths at or after the
    /// insertion point (at the insertion depth) shift right by one.
    pub fn transform_insert(&self, at: &Path) -> Path {
        let depth = at.len() - 1;
        let mut indices = self.0.clone();
        if indices.len() >= at.len()
            && indices[..depth] == at.0[..depth]
            && indices[depth] >= at.0[depth]
        {
            indices[depth] += 1;
        }
        Path(indices)
    }

    /// Adjusts `self` for a node removed at `at`. Returns `None` when
    /// `self` was inside the removed subtree.
    pub fn transform_remove(&self, at: &Path) -> Option<Path> {
        if at.is_ancestor_or_self_of(self) {
            return None;
        }
        let depth = at.len() - 1;
        let mut indices = self.0.clone();
        if indices.len() >= at.len()
            && indices[..depth] == at.0[..depth]
            && indices[depth] > at.0[depth]
        {
            indices[depth] -= 1;
        }
        Some(Path(indices))
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.cmp(b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        // Equal prefix: the shorter path (ancestor) comes first.
        self.0.len().cmp(&other.0.len())
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Path(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Path(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Path(indices.to_vec())
    }
}
