//! Forward and reverse traversal cursors.
//!
//! Both cursor kinds share one step engine, `Traversal`, parameterized by
//! [`Direction`]. A traversal is either active at some index or exhausted:
//!
//! ```text
//! Active(i) --advance--> Active(i ± 1)   if the new index is in [0, len)
//! Active(i) --advance--> Exhausted       otherwise
//! Exhausted --advance--> Exhausted
//! ```
//!
//! Cursors snapshot the container's generation at creation. Any structural
//! mutation made afterwards (only reachable through
//! [`CursorMut::container_mut`], since the borrow checker blocks everything
//! else) makes every later `current`/`assign`/`advance` fail with
//! [`ArrayError::CursorInvalidated`]. Replacing the container outright, by
//! assignment, `mem::swap` or `take`, counts as well: generations are unique
//! per process, so the replacement never carries the snapshot value.

use tracing::debug;

use crate::array::DynamicArray;
use crate::error::ArrayError;

/// Traversal direction of a cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Index 0 towards `len - 1`.
    Forward,
    /// Index `len - 1` towards 0.
    Reverse,
}

impl Direction {
    fn start(self, len: usize) -> Option<usize> {
        match (self, len) {
            (_, 0) => None,
            (Self::Forward, _) => Some(0),
            (Self::Reverse, len) => Some(len - 1),
        }
    }

    fn step(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Forward => index.checked_add(1).filter(|&next| next < len),
            Self::Reverse => index.checked_sub(1),
        }
    }
}

/// Position state shared by [`Cursor`] and [`CursorMut`].
#[derive(Clone, Copy, Debug)]
struct Traversal {
    /// `None` once exhausted.
    position: Option<usize>,
    direction: Direction,
    generation: u64,
}

impl Traversal {
    fn new<T>(array: &DynamicArray<T>, direction: Direction) -> Self {
        Self {
            position: direction.start(array.len()),
            direction,
            generation: array.generation(),
        }
    }

    fn check<T>(&self, array: &DynamicArray<T>) -> Result<(), ArrayError> {
        let found = array.generation();
        if found != self.generation {
            debug!(
                expected = self.generation,
                found,
                direction = ?self.direction,
                "cursor used after structural mutation"
            );
            return Err(ArrayError::CursorInvalidated {
                expected: self.generation,
                found,
            });
        }
        Ok(())
    }

    fn index<T>(&self, array: &DynamicArray<T>) -> Result<usize, ArrayError> {
        self.check(array)?;
        self.position.ok_or(ArrayError::CursorExhausted)
    }

    fn advance<T>(&mut self, array: &DynamicArray<T>) -> Result<(), ArrayError> {
        self.check(array)?;
        if let Some(index) = self.position {
            self.position = self.direction.step(index, array.len());
        }
        Ok(())
    }
}

/// Read-only cursor over a [`DynamicArray`].
///
/// Holds a shared borrow, so the container cannot change underneath it.
/// Also usable as an [`Iterator`] that yields the current element and then
/// advances.
#[derive(Debug)]
pub struct Cursor<'a, T> {
    array: &'a DynamicArray<T>,
    traversal: Traversal,
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            array: self.array,
            traversal: self.traversal,
        }
    }
}

impl<'a, T> Cursor<'a, T> {
    /// Whether the cursor still points at an element.
    pub fn has_more(&self) -> bool {
        self.traversal.position.is_some()
    }

    /// Current index, or `None` once exhausted.
    pub fn position(&self) -> Option<usize> {
        self.traversal.position
    }

    /// Direction this cursor steps in.
    pub fn direction(&self) -> Direction {
        self.traversal.direction
    }

    /// The element under the cursor.
    ///
    /// Returns `Err(ArrayError::CursorExhausted)` once the cursor has run off
    /// the end.
    pub fn current(&self) -> Result<&'a T, ArrayError> {
        let index = self.traversal.index(self.array)?;
        self.array.get(index)
    }

    /// Step one element in the cursor's direction. A no-op once exhausted.
    pub fn advance(&mut self) -> Result<(), ArrayError> {
        self.traversal.advance(self.array)
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.current().ok()?;
        self.advance().ok()?;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match (self.traversal.position, self.traversal.direction) {
            (None, _) => 0,
            (Some(index), Direction::Forward) => self.array.len() - index,
            (Some(index), Direction::Reverse) => index + 1,
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Cursor<'_, T> {}

/// Read/write cursor over a [`DynamicArray`].
///
/// Holds the container's unique borrow. [`assign`](CursorMut::assign)
/// overwrites in place without invalidating the cursor; structural edits
/// through [`container_mut`](CursorMut::container_mut) do invalidate it until
/// [`restart`](CursorMut::restart) is called.
#[derive(Debug)]
pub struct CursorMut<'a, T> {
    array: &'a mut DynamicArray<T>,
    traversal: Traversal,
}

impl<'a, T> CursorMut<'a, T> {
    /// Whether the cursor still points at an element.
    pub fn has_more(&self) -> bool {
        self.traversal.position.is_some()
    }

    /// Current index, or `None` once exhausted.
    pub fn position(&self) -> Option<usize> {
        self.traversal.position
    }

    /// Direction this cursor steps in.
    pub fn direction(&self) -> Direction {
        self.traversal.direction
    }

    /// Whether the container is still at the generation the cursor was
    /// created (or last restarted) at.
    pub fn is_valid(&self) -> bool {
        self.traversal.check(self.array).is_ok()
    }

    /// The element under the cursor.
    pub fn current(&self) -> Result<&T, ArrayError> {
        let index = self.traversal.index(self.array)?;
        self.array.get(index)
    }

    /// Mutable reference to the element under the cursor.
    pub fn current_mut(&mut self) -> Result<&mut T, ArrayError> {
        let index = self.traversal.index(self.array)?;
        self.array.get_mut(index)
    }

    /// Overwrite the element under the cursor, dropping the previous value.
    pub fn assign(&mut self, value: T) -> Result<(), ArrayError> {
        let index = self.traversal.index(self.array)?;
        self.array.set(index, value)
    }

    /// Step one element in the cursor's direction. A no-op once exhausted.
    pub fn advance(&mut self) -> Result<(), ArrayError> {
        self.traversal.advance(self.array)
    }

    /// Read access to the underlying container.
    pub fn container(&self) -> &DynamicArray<T> {
        &*self.array
    }

    /// Mutable access to the underlying container.
    ///
    /// Any structural mutation made through this reference (insert, remove,
    /// growth, clear, take) invalidates the cursor, as does replacing the
    /// container behind it.
    pub fn container_mut(&mut self) -> &mut DynamicArray<T> {
        &mut *self.array
    }

    /// Re-seat the cursor at the start of its direction against the
    /// container's current contents and generation.
    pub fn restart(&mut self) {
        self.traversal = Traversal::new(self.array, self.traversal.direction);
    }
}

impl<T> DynamicArray<T> {
    /// Read-only cursor starting at the given end.
    pub fn cursor_from(&self, direction: Direction) -> Cursor<'_, T> {
        Cursor {
            traversal: Traversal::new(self, direction),
            array: self,
        }
    }

    /// Read-only cursor from index 0 forwards.
    pub fn cursor(&self) -> Cursor<'_, T> {
        self.cursor_from(Direction::Forward)
    }

    /// Read-only cursor from the last index backwards.
    pub fn cursor_rev(&self) -> Cursor<'_, T> {
        self.cursor_from(Direction::Reverse)
    }

    /// Read/write cursor starting at the given end.
    pub fn cursor_mut_from(&mut self, direction: Direction) -> CursorMut<'_, T> {
        CursorMut {
            traversal: Traversal::new(self, direction),
            array: self,
        }
    }

    /// Read/write cursor from index 0 forwards.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        self.cursor_mut_from(Direction::Forward)
    }

    /// Read/write cursor from the last index backwards.
    pub fn cursor_mut_rev(&mut self) -> CursorMut<'_, T> {
        self.cursor_mut_from(Direction::Reverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: i32) -> DynamicArray<i32> {
        (0..n).collect()
    }

    fn drain(cursor: &mut Cursor<'_, i32>) -> Vec<i32> {
        let mut seen = Vec::new();
        while cursor.has_more() {
            seen.push(*cursor.current().unwrap());
            cursor.advance().unwrap();
        }
        seen
    }

    #[test]
    fn forward_visits_in_order() {
        let array = filled(8);
        assert_eq!(drain(&mut array.cursor()), [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn reverse_visits_every_element_including_first() {
        let array = filled(8);
        assert_eq!(drain(&mut array.cursor_rev()), [7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn empty_container_cursor_is_exhausted() {
        let array: DynamicArray<i32> = DynamicArray::new();
        for cursor in [array.cursor(), array.cursor_rev()] {
            assert!(!cursor.has_more());
            assert_eq!(cursor.position(), None);
            assert_eq!(cursor.current(), Err(ArrayError::CursorExhausted));
        }
    }

    #[test]
    fn advance_after_exhaustion_is_noop() {
        let array = filled(1);
        let mut cursor = array.cursor();
        cursor.advance().unwrap();
        assert!(!cursor.has_more());
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert!(!cursor.has_more());
        assert_eq!(cursor.current(), Err(ArrayError::CursorExhausted));
    }

    #[test]
    fn single_element_reverse() {
        let array = filled(1);
        let mut cursor = array.cursor_rev();
        assert_eq!(cursor.position(), Some(0));
        assert_eq!(cursor.current(), Ok(&0));
        cursor.advance().unwrap();
        assert!(!cursor.has_more());
    }

    #[test]
    fn cursor_as_iterator() {
        let array = filled(5);
        let cursor = array.cursor_rev();
        assert_eq!(cursor.len(), 5);
        assert_eq!(cursor.copied().collect::<Vec<_>>(), [4, 3, 2, 1, 0]);
    }

    #[test]
    fn mutable_cursor_writes_through() {
        let mut array = filled(8);
        let mut cursor = array.cursor_mut();
        while cursor.has_more() {
            cursor.assign(42).unwrap();
            cursor.advance().unwrap();
        }
        assert!(cursor.is_valid());
        for i in 0..array.len() {
            assert_eq!(array[i], 42);
        }
    }

    #[test]
    fn mutable_reverse_cursor_writes_through() {
        let mut array = filled(4);
        let mut cursor = array.cursor_mut_rev();
        let mut next = 0;
        while cursor.has_more() {
            *cursor.current_mut().unwrap() = next;
            next += 1;
            cursor.advance().unwrap();
        }
        assert_eq!(array.as_slice(), [3, 2, 1, 0]);
    }

    #[test]
    fn assign_on_exhausted_cursor_fails() {
        let mut array: DynamicArray<i32> = DynamicArray::new();
        let mut cursor = array.cursor_mut();
        assert_eq!(cursor.assign(1), Err(ArrayError::CursorExhausted));
    }

    #[test]
    fn structural_mutation_invalidates_cursor() {
        let mut array = filled(4);
        let mut cursor = array.cursor_mut();
        cursor.advance().unwrap();
        cursor.container_mut().append(99);
        assert!(!cursor.is_valid());
        assert!(matches!(
            cursor.current(),
            Err(ArrayError::CursorInvalidated { .. })
        ));
        assert!(matches!(
            cursor.assign(0),
            Err(ArrayError::CursorInvalidated { .. })
        ));
        assert!(matches!(
            cursor.advance(),
            Err(ArrayError::CursorInvalidated { .. })
        ));
    }

    #[test]
    fn removal_invalidates_exhausted_cursor_too() {
        let mut array = filled(2);
        let mut cursor = array.cursor_mut_rev();
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert!(!cursor.has_more());
        cursor.container_mut().remove_at(0).unwrap();
        assert!(matches!(
            cursor.advance(),
            Err(ArrayError::CursorInvalidated { .. })
        ));
    }

    #[test]
    fn in_place_writes_through_container_keep_cursor_valid() {
        let mut array = filled(3);
        let mut cursor = array.cursor_mut();
        cursor.container_mut().set(2, 7).unwrap();
        assert!(cursor.is_valid());
        assert_eq!(cursor.current(), Ok(&0));
    }

    #[test]
    fn restart_revalidates() {
        let mut array = filled(2);
        let mut cursor = array.cursor_mut_rev();
        cursor.container_mut().insert_at(0, -1).unwrap();
        assert!(!cursor.is_valid());
        cursor.restart();
        assert!(cursor.is_valid());
        assert_eq!(cursor.position(), Some(2));
        assert_eq!(cursor.current(), Ok(&1));
    }

    #[test]
    fn swapping_in_another_container_invalidates() {
        let mut array = filled(3);
        let mut cursor = array.cursor_mut();
        cursor.advance().unwrap();
        cursor.advance().unwrap();

        let mut other = filled(2);
        other.clear();
        std::mem::swap(cursor.container_mut(), &mut other);
        assert!(!cursor.is_valid());
        assert!(matches!(
            cursor.current(),
            Err(ArrayError::CursorInvalidated { .. })
        ));

        // Swapping the original back restores the snapshot exactly.
        std::mem::swap(cursor.container_mut(), &mut other);
        assert!(cursor.is_valid());
        assert_eq!(cursor.current(), Ok(&2));
    }

    #[test]
    fn assigning_a_new_container_invalidates() {
        let mut array = filled(3);
        let mut cursor = array.cursor_mut();
        *cursor.container_mut() = (100..103).collect();
        assert!(!cursor.is_valid());
        assert!(matches!(
            cursor.current(),
            Err(ArrayError::CursorInvalidated { .. })
        ));
        assert!(matches!(
            cursor.assign(0),
            Err(ArrayError::CursorInvalidated { .. })
        ));
        cursor.restart();
        assert_eq!(cursor.current(), Ok(&100));
    }

    #[test]
    fn taking_the_container_invalidates() {
        let mut array = filled(3);
        let mut cursor = array.cursor_mut_rev();
        let taken = cursor.container_mut().take();
        assert_eq!(taken.as_slice(), [0, 1, 2]);
        assert!(matches!(
            cursor.advance(),
            Err(ArrayError::CursorInvalidated { .. })
        ));
        cursor.restart();
        assert!(!cursor.has_more());
    }

    #[test]
    fn cursor_clones_without_cloneable_elements() {
        struct Opaque(u8);
        let array: DynamicArray<Opaque> = [Opaque(1), Opaque(2)].into_iter().collect();
        let mut cursor = array.cursor();
        let copy = cursor.clone();
        cursor.advance().unwrap();
        assert_eq!(copy.current().unwrap().0, 1);
        assert_eq!(cursor.current().unwrap().0, 2);
    }

    #[test]
    fn direction_is_reported() {
        let mut array = filled(2);
        assert_eq!(array.cursor().direction(), Direction::Forward);
        assert_eq!(array.cursor_rev().direction(), Direction::Reverse);
        assert_eq!(
            array.cursor_mut_from(Direction::Reverse).direction(),
            Direction::Reverse
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reverse_is_forward_reversed(values in proptest::collection::vec(any::<u16>(), 0..64)) {
                let array: DynamicArray<u16> = values.iter().copied().collect();
                let forward: Vec<u16> = array.cursor().copied().collect();
                let mut reverse: Vec<u16> = array.cursor_rev().copied().collect();
                reverse.reverse();
                prop_assert_eq!(&forward, &values);
                prop_assert_eq!(&reverse, &values);
            }
        }
    }
}
