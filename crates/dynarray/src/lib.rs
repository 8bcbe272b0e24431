//! Growable array with explicit capacity control and generation-checked
//! cursors.
//!
//! [`DynamicArray`] keeps its logical length separate from its allocated
//! capacity, constructs and destroys elements slot by slot in one owned raw
//! block, and grows geometrically by relocating the live prefix into a
//! larger block. This crate is the only one in the workspace that contains
//! `unsafe` code, confined to `raw.rs` and `array.rs`.
//!
//! # Architecture
//!
//! ```text
//! DynamicArray<T>
//! ├── RawBuffer<T>     (capacity slots; [0, len) live, rest uninitialised)
//! ├── ArrayConfig      (initial capacity, growth factor)
//! └── generation: u64  (fresh process-unique value per structural mutation)
//!
//! Cursor<'_, T> / CursorMut<'_, T>
//! └── Traversal        (position, Direction, generation snapshot)
//! ```
//!
//! # Example
//!
//! ```
//! use dynarray::{ArrayError, DynamicArray};
//!
//! let mut rounds = DynamicArray::with_capacity(2)?;
//! rounds.append(10);
//! rounds.append(30);
//! rounds.insert_at(1, 20)?;
//! assert_eq!(rounds.as_slice(), [10, 20, 30]);
//! assert!(rounds.capacity() > 2);
//!
//! let mut cursor = rounds.cursor_rev();
//! assert_eq!(cursor.current()?, &30);
//! cursor.advance()?;
//! assert_eq!(cursor.current()?, &20);
//!
//! assert!(matches!(
//!     rounds.remove_at(3),
//!     Err(ArrayError::IndexOutOfRange { index: 3, len: 3 })
//! ));
//! # Ok::<(), ArrayError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod config;
pub mod cursor;
pub mod error;
mod raw;

// Public re-exports for the primary API surface.
pub use array::DynamicArray;
pub use config::ArrayConfig;
pub use cursor::{Cursor, CursorMut, Direction};
pub use error::ArrayError;
