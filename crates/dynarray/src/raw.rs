//! Owned raw storage for container slots.
//!
//! [`RawBuffer`] owns one allocation of `capacity` slots of `T` and nothing
//! else: it never knows which slots hold live values, so dropping it frees
//! memory without running any element destructor. The container tracks the
//! live prefix and is responsible for constructing and destroying slots.
//!
//! Every `unsafe fn` here states its precondition in a `# Safety` section and
//! every `unsafe` block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

/// Abort-style failure for capacity arithmetic that does not fit the
/// address space. Treated like allocation failure.
#[cold]
#[track_caller]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

/// One contiguous block of possibly-uninitialised `T` slots.
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawBuffer uniquely owns its allocation, like Box<[MaybeUninit<T>]>.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// A buffer with no slots and no allocation.
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate `capacity` uninitialised slots.
    ///
    /// Zero-sized element types never touch the allocator. Allocation failure
    /// is fatal and goes through [`alloc::handle_alloc_error`].
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 || mem::size_of::<T>() == 0 {
            return Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            };
        }
        let layout = Self::layout(capacity);
        // SAFETY: layout has non-zero size (capacity > 0 and T is not a ZST).
        let raw = unsafe { alloc::alloc(layout) }.cast::<T>();
        let Some(ptr) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };
        Self {
            ptr,
            capacity,
            _marker: PhantomData,
        }
    }

    fn layout(capacity: usize) -> Layout {
        Layout::array::<T>(capacity).unwrap_or_else(|_| capacity_overflow())
    }

    /// Total number of slots, live or not.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Base address of the block, for identity checks.
    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Construct a value in `slot`.
    ///
    /// # Safety
    ///
    /// `slot < capacity` and the slot must be uninitialised (or its previous
    /// value already moved out); otherwise the old value leaks.
    pub(crate) unsafe fn write(&mut self, slot: usize, value: T) {
        debug_assert!(slot < self.capacity);
        // SAFETY: caller guarantees slot is in bounds.
        unsafe { self.ptr.as_ptr().add(slot).write(value) }
    }

    /// Move the value out of `slot`, leaving it logically uninitialised.
    ///
    /// # Safety
    ///
    /// `slot < capacity` and the slot must hold a live value. The caller must
    /// treat the slot as uninitialised afterwards.
    pub(crate) unsafe fn read(&self, slot: usize) -> T {
        debug_assert!(slot < self.capacity);
        // SAFETY: caller guarantees slot is in bounds and initialised.
        unsafe { self.ptr.as_ptr().add(slot).read() }
    }

    /// Run the destructor of the values in `[start, start + count)`.
    ///
    /// # Safety
    ///
    /// Every slot in the range must hold a live value, and must be treated as
    /// uninitialised afterwards.
    pub(crate) unsafe fn drop_range(&mut self, start: usize, count: usize) {
        debug_assert!(start + count <= self.capacity);
        // SAFETY: caller guarantees the range is in bounds and initialised.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(start), count);
            ptr::drop_in_place(tail);
        }
    }

    /// Bitwise move of `count` slots from `src` to `dst` within this block.
    /// Ranges may overlap.
    ///
    /// # Safety
    ///
    /// Both ranges must be in bounds. Source slots not covered by the
    /// destination range become logically uninitialised.
    pub(crate) unsafe fn shift(&mut self, src: usize, dst: usize, count: usize) {
        debug_assert!(src + count <= self.capacity && dst + count <= self.capacity);
        let base = self.ptr.as_ptr();
        // SAFETY: caller guarantees both ranges are in bounds; `copy` handles overlap.
        unsafe { ptr::copy(base.add(src), base.add(dst), count) }
    }

    /// Relocate the first `count` live slots of `old` into the front of this
    /// block, preserving order.
    ///
    /// # Safety
    ///
    /// `count` must not exceed either capacity, `old[..count]` must be live,
    /// and `self[..count]` must be uninitialised. `old[..count]` is logically
    /// uninitialised afterwards.
    pub(crate) unsafe fn relocate_from(&mut self, old: &RawBuffer<T>, count: usize) {
        debug_assert!(count <= old.capacity && count <= self.capacity);
        // SAFETY: distinct allocations never overlap; bounds guaranteed by caller.
        unsafe { ptr::copy_nonoverlapping(old.ptr.as_ptr(), self.ptr.as_ptr(), count) }
    }

    /// View the first `len` slots.
    ///
    /// # Safety
    ///
    /// `len <= capacity` and every slot in `[0, len)` must be live.
    pub(crate) unsafe fn prefix(&self, len: usize) -> &[T] {
        // SAFETY: caller guarantees the prefix is initialised; the pointer is
        // non-null and aligned even when dangling.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), len) }
    }

    /// Mutable view of the first `len` slots.
    ///
    /// # Safety
    ///
    /// Same as [`RawBuffer::prefix`].
    pub(crate) unsafe fn prefix_mut(&mut self, len: usize) -> &mut [T] {
        // SAFETY: as for `prefix`, plus `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), len) }
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.capacity == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        // SAFETY: the block was allocated in `with_capacity` with this exact layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), Self::layout(self.capacity)) }
    }
}
