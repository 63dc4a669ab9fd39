/// Errors returned by determinants and dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The determinant cannot back a fixed-size dictionary.
    #[error("invalid determinant for {type_name}: {reason}")]
    Config {
        /// The key type the determinant was built for.
        type_name: &'static str,
        /// Why the key domain is not representable.
        reason:    String,
    },
    /// The key is not present in the dictionary.
    #[error("no value for the key at index {index}")]
    NotFound {
        /// The index of the missing key.
        index: usize,
    },
    /// The key is already present in the dictionary.
    #[error("a value for the key at index {index} already exists")]
    DuplicateKey {
        /// The index of the occupied key.
        index: usize,
    },
    /// The destination slice is too small to receive the collection.
    #[error("destination has {available} slots from offset {offset}, but {required} are required")]
    Capacity {
        /// The requested start offset in the destination.
        offset:    usize,
        /// The number of slots from `offset` to the end of the destination.
        available: usize,
        /// The number of elements to copy.
        required:  usize,
    },
    /// The dictionary was modified after the cursor took its snapshot.
    #[error("dictionary was modified during enumeration")]
    ConcurrentModification,
    /// The slot array does not match the size reported by the determinant.
    #[error("slot array has length {actual}, but the determinant reports size {expected}")]
    Inconsistent {
        /// The size reported by the determinant.
        expected: usize,
        /// The length of the slot array.
        actual:   usize,
    },
}

/// Result type alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
