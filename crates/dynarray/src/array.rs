//! The growable container.
//!
//! [`DynamicArray`] owns one [`RawBuffer`] and tracks the live prefix of it.
//! Slots `[0, len)` always hold constructed values in logical order; slots
//! `[len, capacity)` are uninitialised. Inserting into a full container
//! allocates a larger block, relocates the live prefix into it and only then
//! releases the old block.
//!
//! Every structural mutation (anything that changes `len` or the storage
//! block) moves the container to a fresh generation. Generations are drawn
//! from one process-wide counter, so no two containers ever share one and a
//! container swapped or assigned in place of another is seen as changed.
//! Cursors record the generation they were created at and refuse to operate
//! once it moves.

#![allow(unsafe_code)]

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::config::ArrayConfig;
use crate::error::ArrayError;
use crate::raw::RawBuffer;

/// Counter for unique generation allocation across all containers.
static GENERATION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A generation value never returned before within this process.
fn next_generation() -> u64 {
    GENERATION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Growable, indexable sequence with explicit capacity control.
///
/// # Thread safety
///
/// A `DynamicArray` has a single owner and no internal synchronisation. It is
/// `Send`/`Sync` whenever `T` is, but concurrent mutation from several threads
/// requires an external lock; that obligation sits with the caller.
///
/// # Moves
///
/// A plain Rust move (`let b = a;`) transfers ownership and makes `a`
/// unusable. [`DynamicArray::take`] is the explicit draining move: storage
/// goes to the returned container and the source is left with zero length
/// *and* zero capacity, still usable for further inserts.
pub struct DynamicArray<T> {
    buf: RawBuffer<T>,
    len: usize,
    config: ArrayConfig,
    generation: u64,
}

impl<T> DynamicArray<T> {
    /// Create an empty container with the default configuration
    /// (8 slots, growth factor 2.0).
    pub fn new() -> Self {
        Self::from_valid_config(ArrayConfig::default())
    }

    /// Create an empty container with `capacity` slots and the default
    /// growth factor.
    ///
    /// Returns `Err(ArrayError::InvalidCapacity)` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_config(ArrayConfig::new(capacity))
    }

    /// Create an empty container from an explicit configuration.
    ///
    /// Returns `Err(ArrayError)` if the configuration does not validate.
    pub fn with_config(config: ArrayConfig) -> Result<Self, ArrayError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ArrayConfig) -> Self {
        Self {
            buf: RawBuffer::with_capacity(config.initial_capacity),
            len: 0,
            config,
            generation: next_generation(),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots, live or not.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The configuration this container was created with.
    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    /// Multiplier applied to capacity when the container is full.
    pub fn growth_factor(&self) -> f64 {
        self.config.growth_factor
    }

    /// Structural generation, replaced on every insert, removal, growth,
    /// clear or take.
    ///
    /// Unique across every container in the process: a fresh, cloned or
    /// taken container never shares a generation with another one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Base address of the storage block.
    ///
    /// Changes when the container grows or is drained by [`take`](Self::take).
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Append `value` as the new last element, growing if full.
    ///
    /// Returns the index the value was placed at.
    pub fn append(&mut self, value: T) -> usize {
        self.reserve_one();
        let index = self.len;
        // SAFETY: reserve_one guarantees index < capacity; the slot is past
        // the live prefix and therefore uninitialised.
        unsafe { self.buf.write(index, value) };
        self.len += 1;
        self.bump();
        index
    }

    /// Insert `value` so that it ends up at `index`, shifting the elements
    /// at `[index, len)` one slot to the right.
    ///
    /// `index == len` behaves like [`append`](Self::append). Returns
    /// `Err(ArrayError::IndexOutOfRange)` if `index > len`; the container is
    /// left untouched in that case.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<usize, ArrayError> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        self.reserve_one();
        // SAFETY: len < capacity after reserve_one, so [index + 1, len + 1) is
        // in bounds. After the shift slot `index` is logically uninitialised.
        unsafe {
            self.buf.shift(index, index + 1, self.len - index);
            self.buf.write(index, value);
        }
        self.len += 1;
        self.bump();
        Ok(index)
    }

    /// Remove and return the element at `index`, shifting the elements at
    /// `[index + 1, len)` one slot to the left.
    ///
    /// Valid range is `[0, len)`; `index == len` is rejected with
    /// `Err(ArrayError::IndexOutOfRange)` like any other out-of-range index.
    pub fn remove_at(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(self.out_of_range(index));
        }
        // SAFETY: index < len so the slot is live. After the read it is
        // uninitialised and immediately overwritten by the shifted tail.
        let value = unsafe {
            let value = self.buf.read(index);
            self.buf.shift(index + 1, index, self.len - index - 1);
            value
        };
        self.len -= 1;
        self.bump();
        Ok(value)
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.bump();
        // SAFETY: the slot at the old `len - 1` was live and is now outside
        // the live prefix.
        Some(unsafe { self.buf.read(self.len) })
    }

    /// Shared reference to the element at `index`.
    pub fn get(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ArrayError::IndexOutOfRange { index, len })
    }

    /// Mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrayError::IndexOutOfRange { index, len })
    }

    /// Overwrite the element at `index`, dropping the previous value.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Overwrite the element at `index` and return the previous value.
    pub fn replace(&mut self, index: usize, value: T) -> Result<T, ArrayError> {
        Ok(mem::replace(self.get_mut(index)?, value))
    }

    /// Destroy every live element. Capacity is kept.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        self.bump();
        // SAFETY: [0, len) was the live prefix; len is already zero so a
        // panicking destructor cannot cause a double drop.
        unsafe { self.buf.drop_range(0, len) };
    }

    /// Move the whole container out, leaving `self` with zero length and
    /// zero capacity.
    ///
    /// The returned container owns the original storage block, so element
    /// addresses are unchanged. The drained source keeps its configuration
    /// and grows to capacity 1 on the next insert.
    pub fn take(&mut self) -> Self {
        let taken = Self {
            buf: mem::replace(&mut self.buf, RawBuffer::empty()),
            len: mem::replace(&mut self.len, 0),
            config: self.config,
            generation: next_generation(),
        };
        self.bump();
        trace!(
            len = taken.len,
            capacity = taken.capacity(),
            "drained container"
        );
        taken
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is always live.
        unsafe { self.buf.prefix(self.len) }
    }

    /// The live elements as a mutable slice.
    ///
    /// Writing through the slice is not a structural mutation and does not
    /// invalidate cursors.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: [0, len) is always live.
        unsafe { self.buf.prefix_mut(self.len) }
    }

    /// Borrowing iterator over the live elements, front to back.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutable borrowing iterator over the live elements, front to back.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    fn reserve_one(&mut self) {
        if self.len == self.buf.capacity() {
            self.grow();
        }
    }

    /// Reallocate to the next capacity and relocate the live prefix.
    ///
    /// The old block is released only after every element has been moved.
    fn grow(&mut self) {
        let old_capacity = self.buf.capacity();
        let new_capacity = self.config.next_capacity(old_capacity);
        let mut fresh = RawBuffer::with_capacity(new_capacity);
        // SAFETY: len <= old_capacity < new_capacity, the old prefix is live
        // and the fresh block is uninitialised.
        unsafe { fresh.relocate_from(&self.buf, self.len) };
        // The old block's slots are now logically uninitialised; dropping it
        // frees memory without touching them.
        drop(mem::replace(&mut self.buf, fresh));
        self.bump();
        trace!(
            old_capacity,
            new_capacity,
            relocated = self.len,
            "grew container storage"
        );
    }

    fn bump(&mut self) {
        self.generation = next_generation();
    }

    fn out_of_range(&self, index: usize) -> ArrayError {
        ArrayError::IndexOutOfRange {
            index,
            len: self.len,
        }
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: [0, len) is live; the RawBuffer field frees the block after.
        unsafe { self.buf.drop_range(0, self.len) };
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: same capacity and configuration, every live element cloned.
impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut copy = Self {
            buf: RawBuffer::with_capacity(self.capacity()),
            len: 0,
            config: self.config,
            generation: next_generation(),
        };
        for value in self.iter() {
            // SAFETY: copy.len < self.len <= capacity, and the slot is past
            // the copy's live prefix. `len` is bumped per element so a
            // panicking clone drops only what was constructed.
            unsafe { copy.buf.write(copy.len, value.clone()) };
            copy.len += 1;
        }
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Element-wise equality; capacity and growth factor are ignored.
impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len`. Use [`DynamicArray::get`] for a checked read.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    /// # Panics
    ///
    /// Panics if `index >= len`. Use [`DynamicArray::get_mut`] for a checked
    /// write.
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.as_mut_slice().get_mut(index) {
            Some(value) => value,
            None => panic!("{}", ArrayError::IndexOutOfRange { index, len }),
        }
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
