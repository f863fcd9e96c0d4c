use std::cmp::Ordering::*;
use std::mem;

use crate::arena::Arena;
use crate::node::{Node, NodeKind};
use crate::{Entry, Position, Side};

/// The position-based binary tree model shared by both balancing strategies.
///
/// Every path from the root ends in an external position; internal positions
/// carry an entry, exactly two children, and a strategy-specific metadata
/// value `M` (the AVL height cache, or `()` for splay). `len` counts
/// internal positions only.
///
/// The read surface (`root`, `parent`, `left`, `right`, classification,
/// `element`) backs the maps' `TreeView` impls; structural edits are
/// reserved for the strategy modules, which are responsible for reducing to
/// the edit preconditions (e.g. relocating a successor before splicing).
#[derive(Debug, Clone)]
pub struct BinaryTree<K, V, M> {
    arena: Arena<Node<K, V, M>>,
    root: Position,
    len: usize,
}

impl<K, V, M> Default for BinaryTree<K, V, M> {
    fn default() -> Self {
        Self::new()
    }
}

// Read surface.
impl<K, V, M> BinaryTree<K, V, M> {
    /// Creates an empty tree: the root is a single external position.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::external(None));
        BinaryTree {
            arena,
            root,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> Position {
        self.root
    }

    pub fn parent(&self, p: Position) -> Option<Position> {
        self.arena[p].parent
    }

    pub fn left(&self, p: Position) -> Option<Position> {
        self.arena[p].children().map(|(left, _)| left)
    }

    pub fn right(&self, p: Position) -> Option<Position> {
        self.arena[p].children().map(|(_, right)| right)
    }

    pub fn is_root(&self, p: Position) -> bool {
        self.arena[p].parent.is_none()
    }

    pub fn is_internal(&self, p: Position) -> bool {
        self.arena[p].is_internal()
    }

    pub fn is_external(&self, p: Position) -> bool {
        !self.arena[p].is_internal()
    }

    pub fn element(&self, p: Position) -> Option<(&K, &V)> {
        self.arena[p].entry().map(|e| (&e.key, &e.value))
    }

    pub(crate) fn key(&self, p: Position) -> Option<&K> {
        self.arena[p].entry().map(|e| &e.key)
    }

    pub(crate) fn value(&self, p: Position) -> Option<&V> {
        self.arena[p].entry().map(|e| &e.value)
    }

    pub(crate) fn children(&self, p: Position) -> Option<(Position, Position)> {
        self.arena[p].children()
    }

    pub(crate) fn side_of(&self, p: Position) -> Option<Side> {
        let parent = self.arena[p].parent?;
        match self.left(parent) {
            Some(left) if left == p => Some(Side::Left),
            _ => Some(Side::Right),
        }
    }

    pub(crate) fn meta(&self, p: Position) -> Option<&M> {
        match &self.arena[p].kind {
            NodeKind::Internal { meta, .. } => Some(meta),
            NodeKind::External => None,
        }
    }

    pub(crate) fn meta_mut(&mut self, p: Position) -> Option<&mut M> {
        match &mut self.arena[p].kind {
            NodeKind::Internal { meta, .. } => Some(meta),
            NodeKind::External => None,
        }
    }
}

// Ordered search primitive.
impl<K: Ord, V, M> BinaryTree<K, V, M> {
    /// Walks down from `from` towards `key` and returns either the internal
    /// position holding it or the external position where it would live (the
    /// natural insertion point). Callers distinguish the two outcomes with
    /// [`BinaryTree::is_internal`].
    pub(crate) fn find(&self, from: Position, key: &K) -> Position {
        let mut current = from;
        loop {
            match &self.arena[current].kind {
                NodeKind::External => return current,
                NodeKind::Internal {
                    entry, left, right, ..
                } => match key.cmp(&entry.key) {
                    Equal => return current,
                    Less => current = *left,
                    Greater => current = *right,
                },
            }
        }
    }
}

// Structural edits.
impl<K, V, M> BinaryTree<K, V, M> {
    /// Converts the external position `p` into an internal node carrying
    /// `entry`, with two fresh external children.
    pub(crate) fn expand_external(&mut self, p: Position, entry: Entry<K, V>)
    where
        M: Default,
    {
        assert!(self.is_external(p), "expand of an internal position");
        let left = self.arena.insert(Node::external(Some(p)));
        let right = self.arena.insert(Node::external(Some(p)));
        self.arena[p].kind = NodeKind::Internal {
            entry,
            left,
            right,
            meta: M::default(),
        };
        self.len += 1;
    }

    /// Swaps the entry stored at the internal position `p`, returning the
    /// previous one. The position and its metadata are untouched.
    pub(crate) fn replace(&mut self, p: Position, entry: Entry<K, V>) -> Entry<K, V> {
        match &mut self.arena[p].kind {
            NodeKind::Internal { entry: stored, .. } => mem::replace(stored, entry),
            NodeKind::External => panic!("replace at an external position"),
        }
    }

    /// Splices out the internal position `p`, which must have at most one
    /// internal child: that child (or one remaining external placeholder)
    /// is promoted into `p`'s slot under `p`'s parent.
    ///
    /// Returns the removed entry and `p`'s former parent, the natural
    /// starting point for the caller's rebalancing walk (`None` when `p`
    /// was the root).
    pub(crate) fn splice(&mut self, p: Position) -> (Entry<K, V>, Option<Position>) {
        let (left, right) = self
            .children(p)
            .unwrap_or_else(|| panic!("splice of an external position"));
        assert!(
            self.is_external(left) || self.is_external(right),
            "splice of a position with two internal children"
        );

        // Promote the internal child if there is one; with two external
        // children either may stand in as the placeholder.
        let promoted = if self.is_internal(left) {
            self.arena.remove(right);
            left
        } else {
            self.arena.remove(left);
            right
        };

        let node = self.arena.remove(p);
        let entry = match node.kind {
            NodeKind::Internal { entry, .. } => entry,
            NodeKind::External => unreachable!("checked internal above"),
        };

        self.arena[promoted].parent = node.parent;
        match node.parent {
            Some(parent) => self.relink_child(parent, p, promoted),
            None => self.root = promoted,
        }
        self.len -= 1;
        (entry, node.parent)
    }

    /// Single left rotation at `x`:
    ///
    /// ```text
    ///      x                y
    ///     / \              / \
    ///    a   y     -->    x   c
    ///       / \          / \
    ///      b   c        a   b
    /// ```
    ///
    /// `x` and its right child must both be internal. Only parent/child
    /// links move; metadata is the caller's business. Returns `y`, the new
    /// subtree root.
    pub(crate) fn rotate_left(&mut self, x: Position) -> Position {
        let y = self.right(x).expect("rotation at an external position");
        assert!(self.is_internal(y), "rotation into an external child");
        let b = self.left(y).expect("internal position has two children");

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        match parent {
            Some(q) => self.relink_child(q, x, y),
            None => self.root = y,
        }

        self.set_left(y, x);
        self.arena[x].parent = Some(y);
        self.set_right(x, b);
        self.arena[b].parent = Some(x);
        y
    }

    /// Single right rotation at `z`; the mirror image of
    /// [`BinaryTree::rotate_left`]. Returns the promoted left child.
    pub(crate) fn rotate_right(&mut self, z: Position) -> Position {
        let y = self.left(z).expect("rotation at an external position");
        assert!(self.is_internal(y), "rotation into an external child");
        let b = self.right(y).expect("internal position has two children");

        let parent = self.arena[z].parent;
        self.arena[y].parent = parent;
        match parent {
            Some(q) => self.relink_child(q, z, y),
            None => self.root = y,
        }

        self.set_right(y, z);
        self.arena[z].parent = Some(y);
        self.set_left(z, b);
        self.arena[b].parent = Some(z);
        y
    }

    /// Leftmost internal position of the subtree rooted at the internal
    /// position `from` (its minimum key).
    pub(crate) fn minimum(&self, from: Position) -> Position {
        let mut current = from;
        loop {
            let left = self.left(current).expect("minimum of an external position");
            if self.is_external(left) {
                return current;
            }
            current = left;
        }
    }

    /// Rightmost internal position of the subtree rooted at the internal
    /// position `from` (its maximum key).
    pub(crate) fn maximum(&self, from: Position) -> Position {
        let mut current = from;
        loop {
            let right = self
                .right(current)
                .expect("maximum of an external position");
            if self.is_external(right) {
                return current;
            }
            current = right;
        }
    }

    /// Resets to the empty tree, keeping the arena allocation.
    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.insert(Node::external(None));
        self.len = 0;
    }

    fn relink_child(&mut self, parent: Position, old: Position, new: Position) {
        match &mut self.arena[parent].kind {
            NodeKind::Internal { left, right, .. } => {
                if *left == old {
                    *left = new;
                } else {
                    *right = new;
                }
            }
            NodeKind::External => unreachable!("external position has no children"),
        }
    }

    fn set_left(&mut self, p: Position, child: Position) {
        match &mut self.arena[p].kind {
            NodeKind::Internal { left, .. } => *left = child,
            NodeKind::External => unreachable!("external position has no children"),
        }
    }

    fn set_right(&mut self, p: Position, child: Position) {
        match &mut self.arena[p].kind {
            NodeKind::Internal { right, .. } => *right = child,
            NodeKind::External => unreachable!("external position has no children"),
        }
    }
}
