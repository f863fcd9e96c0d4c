use std::ops::{Index, IndexMut};

use crate::Position;

/// A slot arena with free-list reuse.
///
/// Freed slots are recycled before the backing vector grows, so a map that
/// churns through inserts and removes stays compact. Indexing a vacant slot
/// panics; that is an internal programming error, the tree never hands out
/// stale positions through its public surface.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> Position {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(value);
                Position(index)
            }
            None => {
                self.slots.push(Some(value));
                Position(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn remove(&mut self, p: Position) -> T {
        let value = self.slots[p.0].take().expect("no node at position");
        self.free.push(p.0);
        value
    }

    /// Drops every slot but keeps the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> Index<Position> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, p: Position) -> &T {
        self.slots[p.0].as_ref().expect("no node at position")
    }
}

impl<T> IndexMut<Position> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, p: Position) -> &mut T {
        self.slots[p.0].as_mut().expect("no node at position")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_and_index() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!("a", arena[a]);
        assert_eq!("b", arena[b]);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let _b = arena.insert(2);
        assert_eq!(1, arena.remove(a));
        let c = arena.insert(3);
        assert_eq!(a, c);
        assert_eq!(3, arena[c]);
    }

    #[test]
    #[should_panic(expected = "no node at position")]
    fn stale_position_panics() {
        let mut arena = Arena::new();
        let a = arena.insert(());
        arena.remove(a);
        let _ = arena[a];
    }
}
