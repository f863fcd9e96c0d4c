use crate::{BinaryTree, Entry, Position, Side, SortedMap, TreeView};

/// A self-adjusting ordered map.
///
/// Every access moves the touched node to the root through zig, zig-zig and
/// zig-zag rotation steps, so recently used keys stay near the top and the
/// amortized cost per operation is O(log n). No balance metadata is kept.
/// Because lookups restructure the tree, `get` takes `&mut self`.
///
/// ```
/// use equilibre::{SplayTreeMap, SortedMap, TreeView};
///
/// let mut map = SplayTreeMap::new();
/// map.put(30, "thirty");
/// map.put(20, "twenty");
/// map.get(&30);
/// // The accessed key is now at the root.
/// assert_eq!(Some((&30, &"thirty")), map.element(map.root()));
/// ```
#[derive(Debug, Clone)]
pub struct SplayTreeMap<K, V> {
    tree: BinaryTree<K, V, ()>,
}

impl<K, V> Default for SplayTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SplayTreeMap<K, V> {
    pub fn new() -> Self {
        SplayTreeMap {
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

impl<K: Ord, V> SplayTreeMap<K, V> {
    /// Looks up `key` and splays: the found node, or on a miss the parent of
    /// the external reached, so the probed neighbourhood moves to the top
    /// either way.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.tree.is_empty() {
            return None;
        }
        let p = self.tree.find(self.tree.root(), key);
        if self.tree.is_external(p) {
            self.splay_nearest(p);
            return None;
        }
        self.splay(p);
        self.tree.value(p)
    }

    pub fn contains_key(&mut self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces, then splays the entry's node to the root.
    /// Returns the value previously stored under `key`, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.tree.is_empty() {
            // The new node is the root already; nothing to splay.
            let root = self.tree.root();
            self.tree.expand_external(root, Entry { key, value });
            return None;
        }
        let p = self.tree.find(self.tree.root(), &key);
        if self.tree.is_external(p) {
            self.tree.expand_external(p, Entry { key, value });
            self.splay(p);
            None
        } else {
            let old = self.tree.replace(p, Entry { key, value });
            self.splay(p);
            Some(old.value)
        }
    }

    /// Removes `key`; returns its previous value, or `None` if absent (a
    /// miss splays the nearest node, mirroring [`SplayTreeMap::get`]).
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if self.tree.is_empty() {
            return None;
        }
        let p = self.tree.find(self.tree.root(), key);
        if self.tree.is_external(p) {
            self.splay_nearest(p);
            return None;
        }

        // Bring the doomed node to the root first; every deletion case then
        // operates directly under the root.
        self.splay(p);
        let (left, right) = self
            .tree
            .children(p)
            .expect("internal position has two children");
        let removed = if self.tree.is_internal(left) && self.tree.is_internal(right) {
            // Two internal children: splay the in-order predecessor (the
            // maximum of the left subtree) to the top of that subtree. As
            // the largest key below the root it ends up with an external
            // right child, so it can be spliced out and its entry moved
            // into the root position, which keeps the left and right
            // subtrees hanging where they are.
            let predecessor = self.tree.maximum(left);
            self.splay_up_to(predecessor, Some(p));
            let (predecessor_entry, _) = self.tree.splice(predecessor);
            self.tree.replace(p, predecessor_entry)
        } else {
            // Zero or one internal child: the splice promotes the child (or
            // collapses the tree back to a single external root).
            let (old, _) = self.tree.splice(p);
            old
        };
        Some(removed.value)
    }

    /// Splays the parent of a missed external position, unless the external
    /// is itself the root (empty tree).
    fn splay_nearest(&mut self, miss: Position) {
        if let Some(parent) = self.tree.parent(miss) {
            self.splay(parent);
        }
    }

    fn splay(&mut self, p: Position) {
        self.splay_up_to(p, None);
    }

    /// Rotates `p` upward until its parent is `top` (all the way to the
    /// root when `top` is `None`). Deletion uses the bounded form to splay
    /// within the left subtree only.
    fn splay_up_to(&mut self, p: Position, top: Option<Position>) {
        if self.tree.is_external(p) {
            return;
        }
        while self.tree.parent(p) != top {
            let parent = self
                .tree
                .parent(p)
                .expect("splay target is below the boundary");
            if self.tree.parent(parent) == top {
                /*
                 * Zig: the parent is the boundary root, one rotation
                 * finishes the climb.
                 */
                match self.tree.side_of(p) {
                    Some(Side::Left) => self.tree.rotate_right(parent),
                    _ => self.tree.rotate_left(parent),
                };
                continue;
            }

            let grandparent = self
                .tree
                .parent(parent)
                .expect("grandparent exists below the boundary");
            let p_side = self.tree.side_of(p).expect("p has a parent");
            let parent_side = self.tree.side_of(parent).expect("parent has a parent");
            match (p_side, parent_side) {
                /*
                 * Zig-zig: target and parent hang off the same side; rotate
                 * the grandparent first, then the (now adjacent) parent,
                 * both in the same direction.
                 *
                 *      g                x
                 *     /                  \
                 *    p        -->         p
                 *   /                      \
                 *  x                        g
                 */
                (Side::Left, Side::Left) => {
                    self.tree.rotate_right(grandparent);
                    let q = self.tree.parent(p).expect("promoted parent remains");
                    self.tree.rotate_right(q);
                }
                (Side::Right, Side::Right) => {
                    self.tree.rotate_left(grandparent);
                    let q = self.tree.parent(p).expect("promoted parent remains");
                    self.tree.rotate_left(q);
                }
                /*
                 * Zig-zag: opposite sides; rotate the parent to line the
                 * target up under the grandparent, then rotate that.
                 *
                 *    g               g              x
                 *   /               /              / \
                 *  p      -->      x      -->     p   g
                 *   \             /
                 *    x           p
                 */
                (Side::Right, Side::Left) => {
                    self.tree.rotate_left(parent);
                    let q = self.tree.parent(p).expect("grandparent remains");
                    self.tree.rotate_right(q);
                }
                (Side::Left, Side::Right) => {
                    self.tree.rotate_right(parent);
                    let q = self.tree.parent(p).expect("grandparent remains");
                    self.tree.rotate_left(q);
                }
            }
        }
    }
}

impl<K: Ord, V> SortedMap for SplayTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn get(&mut self, key: &K) -> Option<&V> {
        SplayTreeMap::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        SplayTreeMap::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        SplayTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        SplayTreeMap::len(self)
    }
}

impl<K, V> TreeView for SplayTreeMap<K, V> {
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

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn from_keys(keys: &[i32]) -> SplayTreeMap<i32, i32> {
        let mut map = SplayTreeMap::new();
        for &k in keys {
            map.put(k, k);
        }
        map
    }

    /// Renders the tree as `(key left right)` with `.` for externals.
    fn shape(map: &SplayTreeMap<i32, i32>) -> String {
        fn render(map: &SplayTreeMap<i32, i32>, p: Position, out: &mut String) {
            match map.element(p) {
                None => out.push('.'),
                Some((key, _)) => {
                    out.push('(');
                    out.push_str(&key.to_string());
                    out.push(' ');
                    render(map, map.left(p).unwrap(), out);
                    out.push(' ');
                    render(map, map.right(p).unwrap(), out);
                    out.push(')');
                }
            }
        }
        let mut out = String::new();
        render(map, map.root(), &mut out);
        out
    }

    fn root_key(map: &SplayTreeMap<i32, i32>) -> Option<i32> {
        map.element(map.root()).map(|(k, _)| *k)
    }

    #[test]
    fn get_on_empty_tree() {
        let mut map = SplayTreeMap::<i32, i32>::new();
        assert_eq!(None, map.get(&50));
    }

    #[test]
    fn first_put_lands_at_root_without_splay() {
        let mut map = SplayTreeMap::new();
        assert_eq!(None, map.put(30, 30));
        assert_eq!(Some(30), root_key(&map));
        assert_eq!(1, map.len());
    }

    #[test]
    fn zig_on_insert() {
        let map = from_keys(&[30, 20]);
        assert_eq!("(20 . (30 . .))", shape(&map));
    }

    #[test]
    fn zig_on_get() {
        let mut map = from_keys(&[30, 20]);
        map.get(&30);
        assert_eq!(Some(30), root_key(&map));
        map.get(&20);
        assert_eq!(Some(20), root_key(&map));
        assert_eq!("(20 . (30 . .))", shape(&map));
    }

    #[test]
    fn zig_zig_chain_on_insert() {
        let map = from_keys(&[30, 20, 10]);
        assert_eq!(Some(10), root_key(&map));
        assert_eq!("(10 . (20 . (30 . .)))", shape(&map));
    }

    #[test]
    fn zig_zag_on_insert() {
        let map = from_keys(&[30, 10, 20]);
        assert_eq!("(20 (10 . .) (30 . .))", shape(&map));
    }

    #[test]
    fn deep_zig_zag_insert() {
        let map = from_keys(&[50, 30, 70, 20, 40, 60, 80, 25]);
        assert_eq!(
            "(25 (20 . .) (70 (40 (30 . .) (60 (50 . .) .)) (80 . .)))",
            shape(&map)
        );
    }

    #[test]
    fn replace_splays_the_updated_node() {
        let mut map = from_keys(&[50, 30, 70]);
        assert_eq!(Some(30), map.put(30, 33));
        assert_eq!(Some(30), root_key(&map));
        assert_eq!(Some(&33), map.get(&30));
        assert_eq!(3, map.len());
    }

    #[test]
    fn failed_get_splays_the_nearest_node() {
        let mut map = from_keys(&[30, 20]);
        // 25 would live under 30; the miss splays 30 to the root.
        assert_eq!(None, map.get(&25));
        assert_eq!(Some(30), root_key(&map));
    }

    #[test]
    fn failed_remove_splays_the_nearest_node() {
        let mut map = from_keys(&[30, 20]);
        assert_eq!(None, map.remove(&25));
        assert_eq!(Some(30), root_key(&map));
        assert_eq!(2, map.len());
    }

    #[test]
    fn remove_last_entry_empties_the_tree() {
        let mut map = from_keys(&[10]);
        assert_eq!(Some(10), map.remove(&10));
        assert!(map.is_empty());
        assert!(map.is_external(map.root()));
    }

    #[test]
    fn remove_root_with_only_left_child() {
        let mut map = from_keys(&[10, 20]);
        // 20 is the root with 10 hanging left.
        assert_eq!(Some(20), map.remove(&20));
        assert_eq!(Some(10), root_key(&map));
        assert_eq!(1, map.len());
    }

    #[test]
    fn remove_root_with_only_right_child() {
        let mut map = from_keys(&[20, 10]);
        assert_eq!(Some(10), map.remove(&10));
        assert_eq!(Some(20), root_key(&map));
        assert_eq!(1, map.len());
    }

    #[test]
    fn remove_with_two_children_relocates_predecessor() {
        let mut map = from_keys(&[50, 30, 70, 20, 40, 60, 80, 35]);
        assert_eq!(Some(40), map.remove(&40));
        // 35, the in-order predecessor, takes over the root after its splay
        // within the left subtree.
        assert_eq!(
            "(35 (30 (20 . .) .) (70 (60 (50 . .) .) (80 . .)))",
            shape(&map)
        );
        assert_eq!(None, map.get(&40));
        assert_eq!(7, map.len());
    }

    #[test]
    fn shared_removal_scenario() {
        let mut map = from_keys(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(Some(30), map.remove(&30));
        assert_eq!(None, map.get(&30));
        for k in [20, 40, 50, 60, 70, 80] {
            assert_eq!(Some(&k), map.get(&k), "key {k} lost by removal");
        }
        assert_eq!(6, map.len());
    }

    #[test]
    fn size_tracks_operations() {
        let mut map = SplayTreeMap::new();
        map.put(1, 1);
        map.put(2, 2);
        map.put(2, 22);
        assert_eq!(2, map.len());
        map.remove(&1);
        assert_eq!(1, map.len());
        map.remove(&1);
        assert_eq!(1, map.len());
    }
}
