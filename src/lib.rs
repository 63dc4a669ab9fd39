//! Fixed-size dictionaries indexed through a dense key determinant.
//!
//! # Why not a `HashMap`?
//! When the key domain is small and statically known, such as a fieldless enum,
//! hashing is wasted work.
//! Every key can be mapped to a small integer directly,
//! and the dictionary becomes a single array with one slot per possible key.
//! Lookup, insertion and removal are then a single array access,
//! and iteration order is the order of the indices rather than an arbitrary hash order.
//!
//! # Determinants
//! The mapping between keys and indices is called a [determinant](Determinant).
//! It reports the number of slots ([`size`](Determinant::size))
//! and provides a bijection between keys and indices in `0..size`.
//!
//! For enums, the mapping is derived from the declared discriminants.
//! Deriving [`Enumeration`] lists the variants at compile time,
//! and [`EnumDeterminant`] validates them at runtime:
//!
//! ```
//! use std::sync::Arc;
//!
//! use fixmap::{EnumDeterminant, FixedSizeDictionary};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, fixmap::Enumeration)]
//! enum Stage {
//!     Parse,
//!     Check,
//!     Emit,
//! }
//!
//! let determinant = Arc::new(EnumDeterminant::<Stage>::new().unwrap());
//! let mut timings = FixedSizeDictionary::new(Arc::clone(&determinant)).unwrap();
//! timings.set(Stage::Emit, 30);
//! timings.set(Stage::Parse, 10);
//!
//! assert_eq!(timings[Stage::Parse], 10);
//! assert_eq!(timings.iter().collect::<Vec<_>>(), [(Stage::Parse, &10), (Stage::Emit, &30)]);
//! ```
//!
//! Determinants are immutable and shared through an [`Arc`](std::sync::Arc).
//! There is no global registry of determinants;
//! build one per key type and pass it to every dictionary that needs it.
//!
//! # Index density
//! The enum determinant uses the discriminant value as the index directly,
//! so the dictionary allocates `max + 1` slots.
//! An enum whose discriminants start at 1000 wastes the first 1000 slots.
//! This is intended: it keeps the index computation an identity function.

#![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(doc, warn(missing_docs))]

mod macros;
#[doc(inline)]
pub use macros::*;

pub mod determinant;
pub use determinant::{BoundedDeterminant, Determinant, EnumDeterminant, Enumeration};

pub mod dict;
pub use dict::{Cursor, EnumDictionary, FixedSizeDictionary};

mod error;
pub use error::{Error, Result};

mod slots;

#[cfg(any(test, feature = "internal-bench"))]
pub mod test_util;
