//! Ordered maps over a position-addressed binary search tree, with two
//! interchangeable self-balancing strategies: height-balanced
//! ([`AvlTreeMap`]) and self-adjusting ([`SplayTreeMap`]).
//!
//! Both maps are thin layers over the same binary tree model, in which
//! every internal node carries an entry and exactly two children, and absent
//! subtrees are marked by external sentinel positions. Nodes live in a slot
//! arena and address each other by [`Position`] index, so the child/parent
//! back-link cycle needs no raw pointers.
//!
//! ```
//! use equilibre::AvlTreeMap;
//!
//! let mut map = AvlTreeMap::new();
//! map.put(50, "fifty");
//! map.put(30, "thirty");
//! map.put(20, "twenty");
//!
//! assert_eq!(Some(&"thirty"), map.get(&30));
//! assert_eq!(Some("twenty"), map.remove(&20));
//! assert_eq!(2, map.len());
//! ```

mod arena;
mod avl;
mod node;
mod splay;
mod tree;

pub use avl::AvlTreeMap;
pub use splay::SplayTreeMap;

pub(crate) use tree::BinaryTree;

/// A handle to a node slot in a tree's arena.
///
/// Positions are plain indices: cheap to copy and compare, valid until the
/// node they name is removed from the tree. Navigating from a stale position
/// is a logic error and may panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(pub(crate) usize);

/// The (key, value) pair stored in an internal position.
///
/// Updating the value of an existing key replaces the entry, not the
/// position, so per-position metadata (the AVL height cache) survives value
/// updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Which child slot of its parent a position hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// The map contract shared by both balancing strategies.
///
/// `get` takes `&mut self` because a splay tree restructures itself on every
/// access; the AVL map also offers an inherent `&self` lookup. A missing key
/// is an ordinary `None` result, never an error, and is distinct from a
/// present entry whose value happens to be an empty marker such as
/// `Option::None`.
pub trait SortedMap {
    type Key;
    type Value;

    /// Returns the value stored under `key`, if any.
    fn get(&mut self, key: &Self::Key) -> Option<&Self::Value>;

    /// Inserts or replaces; returns the previous value for `key`, if any.
    fn put(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

    /// Removes `key`; returns its previous value, or `None` if absent.
    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    /// Number of entries in the map.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only structural inspection, consumed by printers and
/// structure-equality checkers that live outside this crate.
///
/// `left`/`right` return `None` at external positions, `element` returns
/// `None` there too; the root always exists (it is external when the tree
/// is empty).
pub trait TreeView {
    type Key;
    type Value;

    fn root(&self) -> Position;
    fn parent(&self, p: Position) -> Option<Position>;
    fn left(&self, p: Position) -> Option<Position>;
    fn right(&self, p: Position) -> Option<Position>;
    fn is_internal(&self, p: Position) -> bool;
    fn is_external(&self, p: Position) -> bool;
    fn element(&self, p: Position) -> Option<(&Self::Key, &Self::Value)>;
}
