use std::ops::Index;

use crate::{BinaryTree, Entry, Position, SortedMap, TreeView};

/// Cached subtree height: 0 for external positions, 1 for internal leaves.
type Height = u32;

/// A height-balanced ordered map.
///
/// Every internal position caches the height of its subtree; after each
/// insertion or removal a walk from the mutation point to the root recomputes
/// heights and rotates wherever the left/right heights drift more than one
/// apart. Lookups never mutate.
///
/// ```
/// use equilibre::AvlTreeMap;
///
/// let mut map = AvlTreeMap::new();
/// map.put(1, "one");
/// map.put(2, "two");
/// assert_eq!(Some(&"two"), map.get(&2));
/// ```
#[derive(Debug, Clone)]
pub struct AvlTreeMap<K, V> {
    tree: BinaryTree<K, V, Height>,
}

impl<K, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> AvlTreeMap<K, V> {
    pub fn new() -> Self {
        AvlTreeMap {
            tree: BinaryTree::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Pure lookup; unlike the splay map this never restructures, so it only
    /// needs `&self`.
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.tree.is_empty() {
            return None;
        }
        let p = self.tree.find(self.tree.root(), key);
        self.tree.value(p)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `key`/`value`; returns the value previously stored under
    /// `key`, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let p = self.tree.find(self.tree.root(), &key);
        if self.tree.is_external(p) {
            self.tree.expand_external(p, Entry { key, value });
            self.rebalance(Some(p));
            None
        } else {
            // Same key, new entry: shape and heights are unchanged, no
            // rebalancing needed.
            let old = self.tree.replace(p, Entry { key, value });
            Some(old.value)
        }
    }

    /// Removes `key`; returns its previous value, or `None` if absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if self.tree.is_empty() {
            return None;
        }
        let p = self.tree.find(self.tree.root(), key);
        if self.tree.is_external(p) {
            return None;
        }

        let (left, right) = self
            .tree
            .children(p)
            .expect("internal position has two children");
        let removed = if self.tree.is_internal(left) && self.tree.is_internal(right) {
            // Two internal children: relocate the in-order successor (the
            // leftmost position of the right subtree) into `p`, then splice
            // the successor out of its old spot. The successor has no
            // internal left child, so the splice precondition holds.
            let successor = self.tree.minimum(right);
            let (successor_entry, start) = self.tree.splice(successor);
            let old = self.tree.replace(p, successor_entry);
            self.rebalance(start);
            old
        } else {
            let (old, start) = self.tree.splice(p);
            self.rebalance(start);
            old
        };
        Some(removed.value)
    }

    /// Walks from `from` up to the root, recomputing cached heights and
    /// rotating wherever a balance factor leaves [-1, 1]. After a rotation
    /// the walk resumes from the parent of the new subtree root.
    fn rebalance(&mut self, from: Option<Position>) {
        let mut current = from;
        while let Some(p) = current {
            self.update_height(p);
            let balance = self.balance_factor(p);
            let top = if balance > 1 {
                /*
                 * Left subtree over-tall. Non-negative factor at the left
                 * child means the surplus is on its outer side:
                 *
                 *       z             y
                 *      /             / \
                 *     y      -->    x   z      (Left-Left, single rotation)
                 *    /
                 *   x
                 *
                 * A negative factor means it is on the inner side; rotating
                 * the left child first reduces to the Left-Left shape:
                 *
                 *     z           z            x
                 *    /           /            / \
                 *   y    -->    x     -->    y   z  (Left-Right, double)
                 *    \         /
                 *     x       y
                 */
                let (left, _) = self
                    .tree
                    .children(p)
                    .expect("internal position has two children");
                if self.balance_factor(left) >= 0 {
                    self.rotate_right_at(p)
                } else {
                    self.rotate_left_at(left);
                    self.rotate_right_at(p)
                }
            } else if balance < -1 {
                /* Mirror image: Right-Right single, or Right-Left double. */
                let (_, right) = self
                    .tree
                    .children(p)
                    .expect("internal position has two children");
                if self.balance_factor(right) <= 0 {
                    self.rotate_left_at(p)
                } else {
                    self.rotate_right_at(right);
                    self.rotate_left_at(p)
                }
            } else {
                p
            };
            current = self.tree.parent(top);
        }
    }

    /// Rotation plus the height fixups the bare tree primitive leaves to us:
    /// demoted node first, promoted node second.
    fn rotate_left_at(&mut self, x: Position) -> Position {
        let y = self.tree.rotate_left(x);
        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rotate_right_at(&mut self, z: Position) -> Position {
        let y = self.tree.rotate_right(z);
        self.update_height(z);
        self.update_height(y);
        y
    }

    /// External positions have height 0 and carry no cache.
    fn height(&self, p: Position) -> Height {
        self.tree.meta(p).copied().unwrap_or(0)
    }

    fn update_height(&mut self, p: Position) {
        let (left, right) = self
            .tree
            .children(p)
            .expect("internal position has two children");
        let height = 1 + self.height(left).max(self.height(right));
        *self
            .tree
            .meta_mut(p)
            .expect("internal position carries a height") = height;
    }

    fn balance_factor(&self, p: Position) -> i32 {
        let (left, right) = self
            .tree
            .children(p)
            .expect("internal position has two children");
        self.height(left) as i32 - self.height(right) as i32
    }
}

impl<K: Ord, V> SortedMap for AvlTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn get(&mut self, key: &K) -> Option<&V> {
        AvlTreeMap::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        AvlTreeMap::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        AvlTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        AvlTreeMap::len(self)
    }
}

impl<K, V> TreeView for AvlTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn root(&self) -> Position {
        self.tree.root()
    }

    fn parent(&self, p: Position) -> Option<Position> {
        self.tree.parent(p)
    }

    fn left(&self, p: Position) -> Option<Position> {
        self.tree.left(p)
    }

    fn right(&self, p: Position) -> Option<Position> {
        self.tree.right(p)
    }

    fn is_internal(&self, p: Position) -> bool {
        self.tree.is_internal(p)
    }

    fn is_external(&self, p: Position) -> bool {
        self.tree.is_external(p)
    }

    fn element(&self, p: Position) -> Option<(&K, &V)> {
        self.tree.element(p)
    }
}

impl<K: Ord, V> Index<&K> for AvlTreeMap<K, V> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
