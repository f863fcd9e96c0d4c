use std::fmt::Debug;

use crate::{Entry, Position};

/// A tree node: a parent back-link plus either an entry with two children
/// (internal) or nothing at all (external).
#[derive(Clone)]
pub(crate) struct Node<K, V, M> {
    pub(crate) parent: Option<Position>,
    pub(crate) kind: NodeKind<K, V, M>,
}

/// The internal/external split, as a sum type rather than allocated sentinel
/// objects. An internal node always has exactly two child slots, either of
/// which may point at an external node; an external node has no entry and no
/// children.
#[derive(Clone)]
pub(crate) enum NodeKind<K, V, M> {
    Internal {
        entry: Entry<K, V>,
        left: Position,
        right: Position,
        meta: M,
    },
    External,
}

impl<K, V, M> Node<K, V, M> {
    pub(crate) fn external(parent: Option<Position>) -> Self {
        Node {
            parent,
            kind: NodeKind::External,
        }
    }

    #[inline]
    pub(crate) fn is_internal(&self) -> bool {
        matches!(self.kind, NodeKind::Internal { .. })
    }

    #[inline]
    pub(crate) fn children(&self) -> Option<(Position, Position)> {
        match self.kind {
            NodeKind::Internal { left, right, .. } => Some((left, right)),
            NodeKind::External => None,
        }
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry<K, V>> {
        match &self.kind {
            NodeKind::Internal { entry, .. } => Some(entry),
            NodeKind::External => None,
        }
    }
}

impl<K, V, M> Debug for Node<K, V, M>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Internal { entry, .. } => {
                f.write_fmt(format_args!("({:?},{:?})", entry.key, entry.value))
            }
            NodeKind::External => f.write_str("ext"),
        }
    }
}
