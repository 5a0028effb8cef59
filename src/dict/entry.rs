use std::hash::{Hash, Hasher};

use fxhash::FxHasher;

/// Pluggable key/value behavior for a [`super::Dict`].
///
/// This is the Rust shape of the original's `dictType`: a hash function, an
/// optional admission check for growth (`expand_allowed`), and an optional
/// per-entry metadata size (`entry_metadata_bytes`). Key comparison and
/// key/value duplication are not part of the trait — Rust's `K: Eq` bound
/// already gives structural comparison (the idiomatic stand-in for the
/// original's optional `keyCompare`/pointer-identity default), and
/// duplication-vs-adoption is expressed at each call site as `.clone()`
/// vs. a move, rather than as a runtime branch on function-pointer
/// nullness.
pub trait DictType<K, V> {
    /// Hash a key. Must be consistent with `K`'s `Eq` impl.
    fn hash(&self, key: &K) -> u64;

    /// Called by `try_expand` before growing the table. Returning `false`
    /// fails the call with `DictError::OutOfPolicy` without mutating the
    /// dictionary. `more_mem` is the additional byte estimate for the new
    /// table; `used_ratio` is `used / capacity` just before the attempt.
    fn expand_allowed(&self, more_mem: usize, used_ratio: f64) -> bool {
        let _ = (more_mem, used_ratio);
        true
    }

    /// Size in bytes of the per-entry trailing metadata region. Entries are
    /// allocated with a zero-initialized `Box<[u8]>` of this size.
    fn entry_metadata_bytes(&self) -> usize {
        0
    }
}

/// Default [`DictType`], hashing with `fxhash` — the same default hasher the
/// team's hash-table work (`index/hash`) used for small, high-churn keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct FxDictType;

impl<K: Hash, V> DictType<K, V> for FxDictType {
    fn hash(&self, key: &K) -> u64 {
        let mut state = FxHasher::default();
        key.hash(&mut state);
        state.finish()
    }
}

/// A tagged union of value representations, mirroring the original
/// `dictEntry.v` union (`ptr | u64 | s64 | f64`).
///
/// The original's tag is implicit: callers must know which accessor to use.
/// Here the tag is explicit, per spec.md §9's recommendation for a "safer
/// reimplementation". `Dict<K, V, T>` stores a plain `V`; callers who want
/// the union behavior instantiate `Dict<K, DictValue<V>, T>`.
#[derive(Debug, Clone, PartialEq)]
pub enum DictValue<V> {
    Owned(V),
    UInt(u64),
    SInt(i64),
    Double(f64),
}

/// A single chained bucket entry.
///
/// `next` owns the rest of the chain, so dropping the head entry drops the
/// whole chain — Rust's `Drop` stands in for the original's
/// `keyDestructor`/`valDestructor` pair.
pub(crate) struct DictEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) metadata: Box<[u8]>,
    pub(crate) next: Option<Box<DictEntry<K, V>>>,
}

impl<K, V> DictEntry<K, V> {
    pub(crate) fn new(key: K, value: V, metadata_bytes: usize) -> Self {
        Self {
            key,
            value,
            metadata: vec![0u8; metadata_bytes].into_boxed_slice(),
            next: None,
        }
    }
}
