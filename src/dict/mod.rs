//! An incrementally-rehashing chained hash dictionary with pluggable
//! key/value behavior, random sampling, and a cursor-stable scan.
//!
//! See spec.md §4.1 / SPEC_FULL.md for the full contract. This module
//! implements the dictionary only; the quicklist lives in [`crate::quicklist`].

mod entry;
mod hash;
mod iter;
mod random;
mod scan;

pub use entry::{DictType, DictValue, FxDictType};
pub use hash::{gen_case_hash_function, gen_hash_function, HashSeed};
pub use iter::{DictCursor, UnsafeDictCursor};

use crate::config::ResizePolicy;
use crate::error::{DictError, DictResult};
use entry::DictEntry;

/// Initial table size (as an exponent: `1 << 2 == 4`), matching
/// `DICT_HT_INITIAL_EXP` / `DICT_HT_INITIAL_SIZE` in the original.
pub const DICT_HT_INITIAL_EXP: u32 = 2;
pub const DICT_HT_INITIAL_SIZE: usize = 1 << DICT_HT_INITIAL_EXP;

/// How many freed entries pass between `empty`'s progress callback calls.
const EMPTY_PROGRESS_MILESTONE: usize = 1024;

/// One of the dictionary's two hash tables. `size_exp < 0` means
/// unallocated (`T[1]` outside of a rehash, or a brand new, empty dict's
/// `T[0]`), mirroring the original's `ht_size_exp[t] == -1` sentinel.
struct Table<K, V> {
    buckets: Vec<Option<Box<DictEntry<K, V>>>>,
    used: usize,
    size_exp: i8,
}

impl<K, V> Table<K, V> {
    fn empty() -> Self {
        Self {
            buckets: Vec::new(),
            used: 0,
            size_exp: -1,
        }
    }

    fn with_size_exp(exp: u32) -> Self {
        let len = 1usize << exp;
        let mut buckets = Vec::with_capacity(len);
        buckets.resize_with(len, || None);
        Self {
            buckets,
            used: 0,
            size_exp: exp as i8,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        if self.size_exp < 0 {
            0
        } else {
            1usize << self.size_exp
        }
    }

    #[inline]
    fn mask(&self) -> usize {
        self.capacity().wrapping_sub(1)
    }
}

/// The dictionary itself: two tables, a rehash cursor, and a pause depth.
///
/// `K` must be `Eq`; key comparison always uses structural equality (the
/// idiomatic stand-in for the original's optional `keyCompare`, see
/// SPEC_FULL.md §4.1).
pub struct Dict<K, V, T: DictType<K, V>> {
    dict_type: T,
    tables: [Table<K, V>; 2],
    rehash_idx: i64,
    pause_rehash: i32,
    policy: ResizePolicy,
}

impl<K, V> Dict<K, V, FxDictType>
where
    K: std::hash::Hash + Eq,
{
    /// Creates an empty dictionary using the bundled `fxhash`-based
    /// [`FxDictType`] — the default the team's own hash-table work used.
    pub fn with_default_type() -> Self {
        Dict::create(FxDictType)
    }
}

impl<K: Eq, V, T: DictType<K, V>> Dict<K, V, T> {
    pub fn create(dict_type: T) -> Self {
        Self::with_policy(dict_type, ResizePolicy::default())
    }

    pub fn with_policy(dict_type: T, policy: ResizePolicy) -> Self {
        Self {
            dict_type,
            tables: [Table::empty(), Table::empty()],
            rehash_idx: -1,
            pause_rehash: 0,
            policy,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables[0].used + self.tables[1].used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_rehashing(&self) -> bool {
        self.rehash_idx != -1
    }

    #[inline]
    pub fn rehash_index(&self) -> i64 {
        self.rehash_idx
    }

    #[inline]
    pub fn table_size_exp(&self, table: usize) -> i8 {
        self.tables[table].size_exp
    }

    #[inline]
    pub fn table_used(&self, table: usize) -> usize {
        self.tables[table].used
    }

    pub fn enable_resize(&mut self) {
        self.policy.enable_resize();
    }

    pub fn disable_resize(&mut self) {
        self.policy.disable_resize();
    }

    pub fn pause_rehashing(&mut self) {
        self.pause_rehash += 1;
    }

    pub fn resume_rehashing(&mut self) {
        debug_assert!(self.pause_rehash > 0, "resume_rehashing without a matching pause");
        self.pause_rehash -= 1;
    }

    // ---- expand / rehash --------------------------------------------------

    /// Unconditional grow: always succeeds (an allocation failure aborts
    /// the process the same way the original's `dictExpand` does).
    pub fn expand(&mut self, n: usize) {
        let target_exp = target_exp_for(n.max(DICT_HT_INITIAL_SIZE));
        self.expand_to(target_exp);
    }

    /// Grow, but first ask `DictType::expand_allowed`. Fails with
    /// `OutOfPolicy` without touching `self` if denied.
    pub fn try_expand(&mut self, n: usize) -> DictResult<()> {
        let target_exp = target_exp_for(n.max(DICT_HT_INITIAL_SIZE));
        let target_size = 1usize << target_exp;
        let more_mem = target_size * std::mem::size_of::<DictEntry<K, V>>();
        let used_ratio = self.load_factor();
        if !self.dict_type.expand_allowed(more_mem, used_ratio) {
            return Err(DictError::OutOfPolicy);
        }
        self.expand_to(target_exp);
        Ok(())
    }

    fn load_factor(&self) -> f64 {
        let cap = self.tables[0].capacity();
        if cap == 0 {
            0.0
        } else {
            self.tables[0].used as f64 / cap as f64
        }
    }

    /// Implements spec.md §4.1 `expand`: if `T[0]` is empty and we are not
    /// rehashing, allocate `T[0]` directly; otherwise allocate `T[1]` and
    /// start an incremental rehash into it.
    fn expand_to(&mut self, target_exp: u32) {
        if self.tables[0].size_exp < 0 && !self.is_rehashing() {
            self.tables[0] = Table::with_size_exp(target_exp);
        } else {
            self.tables[1] = Table::with_size_exp(target_exp);
            self.rehash_idx = 0;
        }
    }

    /// Shrinks to the smallest power of two `>= max(used, INITIAL_SIZE)`,
    /// if resizing is enabled and not paused.
    pub fn resize(&mut self) -> bool {
        if !self.policy.is_resize_enabled() || self.is_rehashing() || self.pause_rehash > 0 {
            return false;
        }
        self.expand(self.tables[0].used);
        true
    }

    fn expand_if_needed(&mut self) {
        if self.is_rehashing() {
            return;
        }
        if self.tables[0].size_exp < 0 {
            self.expand(DICT_HT_INITIAL_SIZE);
            return;
        }
        let used = self.tables[0].used;
        let cap = self.tables[0].capacity();
        let load_triggered = used >= cap && self.policy.is_resize_enabled();
        let forced = cap > 0 && (used as f64) / (cap as f64) > self.policy.force_resize_ratio;
        if load_triggered || forced {
            let _ = self.try_expand(used + 1);
        }
    }

    fn maybe_rehash_step(&mut self) {
        if self.pause_rehash == 0 && self.is_rehashing() {
            self.rehash(1);
        }
    }

    /// Migrates up to `n` non-empty buckets of `T[0]` into `T[1]`, skipping
    /// at most `10*n` empty buckets. Returns `true` if rehashing is still
    /// in progress afterward.
    pub fn rehash(&mut self, n: usize) -> bool {
        if !self.is_rehashing() {
            return false;
        }
        let mut steps = n;
        let mut empty_budget = (n * 10) as i64;
        while steps > 0 {
            if self.tables[0].used == 0 {
                self.finish_rehash();
                return false;
            }
            while self.tables[0].buckets[self.rehash_idx as usize].is_none() {
                self.rehash_idx += 1;
                empty_budget -= 1;
                if empty_budget <= 0 {
                    return true;
                }
            }
            let mut chain = self.tables[0].buckets[self.rehash_idx as usize].take();
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let h = self.dict_type.hash(&entry.key);
                let idx1 = (h as usize) & self.tables[1].mask();
                entry.next = self.tables[1].buckets[idx1].take();
                self.tables[1].buckets[idx1] = Some(entry);
                self.tables[0].used -= 1;
                self.tables[1].used += 1;
            }
            self.rehash_idx += 1;
            steps -= 1;
        }
        true
    }

    fn finish_rehash(&mut self) {
        self.tables[0] = std::mem::replace(&mut self.tables[1], Table::empty());
        self.rehash_idx = -1;
    }

    /// Batches `rehash(100)` calls, polling the wall clock so as not to run
    /// longer than `ms` milliseconds. Returns the number of batches run.
    pub fn rehash_milliseconds(&mut self, ms: u64) -> u32 {
        let deadline = std::time::Instant::now() + std::time::Duration::from_millis(ms);
        let mut batches = 0u32;
        while self.is_rehashing() && std::time::Instant::now() < deadline {
            self.rehash(100);
            batches += 1;
        }
        batches
    }

    // ---- insertion ----------------------------------------------------

    fn insert_new_into(&mut self, table_idx: usize, key: K, value: V) -> &mut V {
        let h = self.dict_type.hash(&key);
        let meta_bytes = self.dict_type.entry_metadata_bytes();
        let idx = (h as usize) & self.tables[table_idx].mask();
        let mut entry = Box::new(DictEntry::new(key, value, meta_bytes));
        entry.next = self.tables[table_idx].buckets[idx].take();
        self.tables[table_idx].buckets[idx] = Some(entry);
        self.tables[table_idx].used += 1;
        &mut self.tables[table_idx].buckets[idx].as_mut().unwrap().value
    }

    fn insert_new(&mut self, key: K, value: V) -> &mut V {
        self.expand_if_needed();
        let target = if self.is_rehashing() { 1 } else { 0 };
        self.insert_new_into(target, key, value)
    }

    /// Finds `key`'s `(table, bucket)` location, or `None`.
    fn locate(&self, key: &K) -> Option<(usize, usize)> {
        if self.tables[0].size_exp < 0 {
            return None;
        }
        let h = self.dict_type.hash(key);
        let idx0 = (h as usize) & self.tables[0].mask();
        if find_ref(&self.tables[0].buckets[idx0], key).is_some() {
            return Some((0, idx0));
        }
        if self.is_rehashing() {
            let idx1 = (h as usize) & self.tables[1].mask();
            if find_ref(&self.tables[1].buckets[idx1], key).is_some() {
                return Some((1, idx1));
            }
        }
        None
    }

    fn locate_entry_ref(&self, key: &K) -> Option<&DictEntry<K, V>> {
        let (t, idx) = self.locate(key)?;
        find_ref(&self.tables[t].buckets[idx], key)
    }

    fn locate_mut(&mut self, key: &K) -> Option<&mut DictEntry<K, V>> {
        let (t, idx) = self.locate(key)?;
        find_mut_ref(&mut self.tables[t].buckets[idx], key)
    }

    /// Inserts a new `(key, value)`. `Err(Exists)` if `key` is already
    /// present; the dictionary is left untouched in that case.
    pub fn add(&mut self, key: K, value: V) -> DictResult<()> {
        self.maybe_rehash_step();
        if self.locate_entry_ref(&key).is_some() {
            return Err(DictError::Exists);
        }
        self.insert_new(key, value);
        Ok(())
    }

    /// The primitive `add`/`replace`/`add_or_find` build on: if `key`
    /// exists, returns `Err` with a mutable reference to its value; else
    /// inserts `V::default()` and returns `Ok` with a mutable reference to
    /// it for the caller to populate.
    pub fn add_raw(&mut self, key: K) -> Result<&mut V, &mut V>
    where
        V: Default,
    {
        self.maybe_rehash_step();
        if let Some((t, idx)) = self.locate(&key) {
            let entry =
                find_mut_ref(&mut self.tables[t].buckets[idx], &key).expect("located above");
            return Err(&mut entry.value);
        }
        Ok(self.insert_new(key, V::default()))
    }

    /// Insert-or-find: returns a mutable reference to `key`'s value,
    /// inserting `V::default()` first if absent.
    pub fn add_or_find(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        match self.add_raw(key) {
            Ok(v) => v,
            Err(v) => v,
        }
    }

    /// Insert-or-overwrite. Returns `true` if a new entry was inserted,
    /// `false` if an existing one was overwritten. The prior value is
    /// dropped only once the new one has already been moved into place, so
    /// self-referential replace (storing a value derived from the one it
    /// replaces) is safe.
    pub fn replace(&mut self, key: K, value: V) -> bool {
        self.maybe_rehash_step();
        if let Some(entry) = self.locate_mut(&key) {
            entry.value = value;
            false
        } else {
            self.insert_new(key, value);
            true
        }
    }

    pub fn find(&mut self, key: &K) -> Option<&V> {
        self.maybe_rehash_step();
        self.locate_entry_ref(key).map(|e| &e.value)
    }

    pub fn fetch_value(&mut self, key: &K) -> Option<&V> {
        self.find(key)
    }

    pub fn contains_key(&mut self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes and drops `key`'s entry. `Err(NotFound)` if absent.
    pub fn delete(&mut self, key: &K) -> DictResult<()> {
        self.maybe_rehash_step();
        let (t, idx) = self.locate(key).ok_or(DictError::NotFound)?;
        let slot = slot_for(&mut self.tables[t].buckets[idx], key);
        let removed = slot.take().expect("slot_for found a match");
        *slot = removed.next;
        self.tables[t].used -= 1;
        Ok(())
    }

    /// Detaches `key`'s entry without dropping it, returning the owned
    /// `(key, value)` pair. There is no separate "free unlinked entry"
    /// step here (unlike the original's `dictFreeUnlinkedEntry`) — Rust
    /// drops the pair for you whenever the caller lets it go out of scope.
    pub fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        self.maybe_rehash_step();
        let (t, idx) = self.locate(key)?;
        let slot = slot_for(&mut self.tables[t].buckets[idx], key);
        let mut removed = slot.take().expect("slot_for found a match");
        *slot = removed.next.take();
        self.tables[t].used -= 1;
        Some((removed.key, removed.value))
    }

    /// Drops every entry, invoking `progress(done, total)` at milestones,
    /// then resets both tables to empty.
    pub fn empty<F: FnMut(usize, usize)>(&mut self, mut progress: F) {
        let total = self.len();
        let mut done = 0usize;
        for t in 0..2 {
            let len = self.tables[t].buckets.len();
            for i in 0..len {
                if let Some(mut chain) = self.tables[t].buckets[i].take() {
                    loop {
                        done += 1;
                        if done % EMPTY_PROGRESS_MILESTONE == 0 || done == total {
                            progress(done, total);
                        }
                        match chain.next.take() {
                            Some(next) => chain = next,
                            None => break,
                        }
                    }
                }
            }
        }
        self.tables = [Table::empty(), Table::empty()];
        self.rehash_idx = -1;
    }

    /// Equivalent to `empty` followed by freeing the dictionary itself —
    /// in Rust, that's just letting `self` drop.
    pub fn release(self) {}

    pub(crate) fn fingerprint(&self) -> u64 {
        let vals = [
            self.tables[0].buckets.as_ptr() as usize as u64,
            self.tables[0].size_exp as i64 as u64,
            self.tables[0].used as u64,
            self.tables[1].buckets.as_ptr() as usize as u64,
            self.tables[1].size_exp as i64 as u64,
            self.tables[1].used as u64,
        ];
        let mut h = 0u64;
        for v in vals {
            h = mix64(h ^ mix64(v));
        }
        h
    }
}

/// Smallest power-of-two exponent `e` such that `1 << e >= n`.
fn target_exp_for(n: usize) -> u32 {
    let n = n.max(1);
    (usize::BITS - (n - 1).leading_zeros()).max(DICT_HT_INITIAL_EXP)
}

/// Any reasonable low-collision 64-bit mixer is fine here (spec.md §9): this
/// is the splitmix64 finalizer.
pub(crate) fn mix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51afd7ed558ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ceb9fe1a85ec53);
    x ^= x >> 33;
    x
}

pub(crate) fn find_ref<'a, K: Eq, V>(
    bucket: &'a Option<Box<DictEntry<K, V>>>,
    key: &K,
) -> Option<&'a DictEntry<K, V>> {
    match bucket {
        Some(e) if &e.key == key => Some(e),
        Some(e) => find_ref(&e.next, key),
        None => None,
    }
}

pub(crate) fn find_mut_ref<'a, K: Eq, V>(
    bucket: &'a mut Option<Box<DictEntry<K, V>>>,
    key: &K,
) -> Option<&'a mut DictEntry<K, V>> {
    match bucket {
        Some(e) if &e.key == key => Some(e),
        Some(e) => find_mut_ref(&mut e.next, key),
        None => None,
    }
}

/// Returns the `&mut Option<Box<..>>` slot currently holding `key`'s entry,
/// or the trailing empty slot if `key` is absent. Detaching a node given
/// this slot is `*slot = slot.take().unwrap().next`.
pub(crate) fn slot_for<'a, K: Eq, V>(
    bucket: &'a mut Option<Box<DictEntry<K, V>>>,
    key: &K,
) -> &'a mut Option<Box<DictEntry<K, V>>> {
    if matches!(bucket, Some(e) if &e.key == key) {
        return bucket;
    }
    match bucket {
        Some(e) => slot_for(&mut e.next, key),
        None => bucket,
    }
}

pub(crate) fn chain_len<K, V>(mut cur: Option<&DictEntry<K, V>>) -> usize {
    let mut n = 0;
    while let Some(e) = cur {
        n += 1;
        cur = e.next.as_deref();
    }
    n
}

pub(crate) fn nth<K, V>(mut cur: Option<&DictEntry<K, V>>, mut n: usize) -> &DictEntry<K, V> {
    loop {
        match cur {
            Some(e) if n == 0 => return e,
            Some(e) => {
                cur = e.next.as_deref();
                n -= 1;
            }
            None => unreachable!("n out of range for this chain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> Dict<String, u64, FxDictType> {
        Dict::create(FxDictType)
    }

    #[test]
    fn add_find_delete_roundtrip() {
        let mut d = dict();
        d.add("a".to_string(), 1).unwrap();
        assert_eq!(d.find(&"a".to_string()), Some(&1));
        assert_eq!(d.add("a".to_string(), 2), Err(DictError::Exists));
        assert!(d.delete(&"a".to_string()).is_ok());
        assert_eq!(d.find(&"a".to_string()), None);
        assert_eq!(d.delete(&"a".to_string()), Err(DictError::NotFound));
    }

    #[test]
    fn replace_is_idempotent() {
        let mut d = dict();
        assert!(d.replace("k".to_string(), 1));
        assert!(!d.replace("k".to_string(), 1));
        assert_eq!(d.find(&"k".to_string()), Some(&1));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn s1_rehash_under_load() {
        let mut d = dict();
        for i in 0..1024u64 {
            d.add(format!("k{i}"), i).unwrap();
            // touch an earlier key, exercising rehash-in-progress lookups
            let probe = format!("k{}", i / 2);
            assert_eq!(d.find(&probe), Some(&(i / 2)));
        }
        assert_eq!(d.len(), 1024);
        assert!(d.table_size_exp(0) >= 10 || d.table_size_exp(1) >= 10);
        for i in (0..1024u64).rev() {
            d.delete(&format!("k{i}")).unwrap();
        }
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn unlink_returns_owned_pair_without_dropping() {
        let mut d = dict();
        d.add("a".to_string(), 42).unwrap();
        let (k, v) = d.unlink(&"a".to_string()).unwrap();
        assert_eq!((k.as_str(), v), ("a", 42));
        assert_eq!(d.find(&"a".to_string()), None);
    }

    #[test]
    fn add_or_find_inserts_default_once() {
        let mut d: Dict<String, u64, FxDictType> = dict();
        *d.add_or_find("counter".to_string()) += 1;
        *d.add_or_find("counter".to_string()) += 1;
        assert_eq!(d.find(&"counter".to_string()), Some(&2));
    }
}
