//! Safe and unsafe iteration over a [`super::Dict`].
//!
//! Neither cursor borrows the dictionary between calls to `next` — each
//! step takes `&mut Dict`/`&Dict` explicitly, the same shape as the
//! original's `dictNext(iter)` taking a `dict *` stashed inside the
//! iterator. That sidesteps the aliasing a Rust `Iterator` impl would
//! otherwise demand, and keeps the actual contract: callers may freely
//! call other `Dict` methods between `next` calls, but not *during* one.
//!
//! Resuming after a concurrent mutation is approximated by remembering
//! the *key* of the next entry to visit rather than a raw pointer to it,
//! which is why both cursors require `K: Clone`.

use super::entry::DictType;
use super::Dict;

/// Cursor state for a safe iteration session. Pairs with
/// [`Dict::begin_safe_iter`] / [`Dict::end_safe_iter`].
#[derive(Clone)]
pub struct DictCursor<K> {
    table: u8,
    bucket: i64,
    next_key: Option<K>,
}

impl<K> Default for DictCursor<K> {
    fn default() -> Self {
        Self {
            table: 0,
            bucket: -1,
            next_key: None,
        }
    }
}

/// Cursor state for an unsafe iteration session: identical stepping to
/// [`DictCursor`], but paired with a fingerprint captured at
/// [`Dict::begin_unsafe_iter`] and checked at
/// [`Dict::end_unsafe_iter`] — any structural mutation observed in
/// between is a fatal error, matching the original's `dictReleaseIterator`
/// assertion.
pub struct UnsafeDictCursor<K> {
    inner: DictCursor<K>,
    fingerprint: u64,
}

impl<K: Eq + Clone, V, T: DictType<K, V>> Dict<K, V, T> {
    pub fn begin_safe_iter(&mut self) -> DictCursor<K> {
        self.pause_rehash += 1;
        DictCursor::default()
    }

    pub fn end_safe_iter(&mut self, _cursor: DictCursor<K>) {
        self.resume_rehashing();
    }

    pub fn begin_unsafe_iter(&self) -> UnsafeDictCursor<K> {
        UnsafeDictCursor {
            inner: DictCursor::default(),
            fingerprint: self.fingerprint(),
        }
    }

    /// Panics if the dictionary was structurally mutated (any add, delete,
    /// rehash step, resize...) since `begin_unsafe_iter`.
    pub fn end_unsafe_iter(&self, cursor: UnsafeDictCursor<K>) {
        assert_eq!(
            self.fingerprint(),
            cursor.fingerprint,
            "Dict mutated while an unsafe iterator was live"
        );
    }

    pub fn unsafe_iter_next<'a>(&'a self, cursor: &mut UnsafeDictCursor<K>) -> Option<(&'a K, &'a V)> {
        self.cursor_next(&mut cursor.inner)
    }

    pub fn safe_iter_next<'a>(&'a self, cursor: &mut DictCursor<K>) -> Option<(&'a K, &'a V)> {
        self.cursor_next(cursor)
    }

    fn cursor_next<'a>(&'a self, cursor: &mut DictCursor<K>) -> Option<(&'a K, &'a V)> {
        if let Some(key) = cursor.next_key.take() {
            if let Some(entry) = self.locate_entry_ref(&key) {
                cursor.next_key = entry.next.as_deref().map(|e| e.key.clone());
                return Some((&entry.key, &entry.value));
            }
            // The entry we were about to visit was deleted out from under
            // us; fall through and resume scanning forward by bucket.
        }
        loop {
            cursor.bucket += 1;
            let table = &self.tables[cursor.table as usize];
            if table.size_exp < 0 || (cursor.bucket as usize) >= table.buckets.len() {
                if cursor.table == 0 && self.is_rehashing() {
                    cursor.table = 1;
                    cursor.bucket = -1;
                    continue;
                }
                return None;
            }
            if let Some(head) = table.buckets[cursor.bucket as usize].as_deref() {
                cursor.next_key = head.next.as_deref().map(|e| e.key.clone());
                return Some((&head.key, &head.value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dict::{Dict, FxDictType};

    #[test]
    fn safe_iteration_visits_every_entry() {
        let mut d: Dict<u32, u32, FxDictType> = Dict::create(FxDictType);
        for i in 0..200u32 {
            d.add(i, i * 10).unwrap();
        }
        let mut seen = std::collections::HashSet::new();
        let mut cursor = d.begin_safe_iter();
        while let Some((k, v)) = d.safe_iter_next(&mut cursor) {
            assert_eq!(*v, *k * 10);
            seen.insert(*k);
        }
        d.end_safe_iter(cursor);
        assert_eq!(seen.len(), 200);
    }

    #[test]
    #[should_panic(expected = "mutated")]
    fn unsafe_iteration_detects_mutation() {
        let mut d: Dict<u32, u32, FxDictType> = Dict::create(FxDictType);
        d.add(1, 1).unwrap();
        d.add(2, 2).unwrap();
        let mut cursor = d.begin_unsafe_iter();
        let _ = d.unsafe_iter_next(&mut cursor);
        d.add(3, 3).unwrap();
        d.end_unsafe_iter(cursor);
    }
}
