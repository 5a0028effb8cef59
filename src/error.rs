use thiserror::Error;

/// Errors raised by [`crate::dict::Dict`] operations.
///
/// `OutOfMemory` has no variant here: an allocation failure aborts the
/// process the same way the original's unconditional `expand` does, rather
/// than surfacing as a `Result`. `BadIterator` likewise has no variant; an
/// unsafe iterator whose fingerprint no longer matches on release is a
/// programmer error and panics instead of returning a value a caller could
/// recover from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// `add` was called with a key that is already present.
    #[error("key already exists")]
    Exists,
    /// `delete`/`unlink` was called with a key that is not present.
    #[error("key not found")]
    NotFound,
    /// `try_expand` was denied by `DictType::expand_allowed`.
    #[error("expand denied by policy")]
    OutOfPolicy,
}

pub type DictResult<T> = std::result::Result<T, DictError>;

/// Errors raised by [`crate::quicklist::Quicklist`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuicklistError {
    /// An index-based operation was given an index beyond the list bounds.
    #[error("index out of range")]
    OutOfRange,
}

pub type QuicklistResult<T> = std::result::Result<T, QuicklistError>;
