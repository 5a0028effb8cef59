//! Random sampling: a cheap biased sample (`get_random_key`), an unbiased
//! one built on top of it (`get_fair_random_key`), and the bounded-work
//! bulk sampler both are built from (`get_some_keys`).

use rand::Rng;

use super::entry::DictType;
use super::{chain_len, nth};
use super::Dict;

impl<K: Eq, V, T: DictType<K, V>> Dict<K, V, T> {
    fn total_slots(&self) -> u64 {
        if self.is_rehashing() {
            let cap0 = self.tables[0].capacity() as u64;
            let cap1 = self.tables[1].capacity() as u64;
            (cap0 - self.rehash_idx as u64) + cap1
        } else {
            self.tables[0].capacity() as u64
        }
    }

    /// Maps a logical offset (`0..total_slots()`) to a concrete
    /// `(table, bucket)`, treating the live portion of `T[0]`
    /// (`rehash_idx..capacity`, or all of it if not rehashing) followed by
    /// all of `T[1]` as one contiguous ring.
    fn logical_slot(&self, offset: u64) -> (usize, usize) {
        if self.is_rehashing() {
            let cap0 = self.tables[0].capacity() as u64;
            let remaining0 = cap0 - self.rehash_idx as u64;
            if offset < remaining0 {
                (0, self.rehash_idx as usize + offset as usize)
            } else {
                (1, (offset - remaining0) as usize)
            }
        } else {
            (0, offset as usize)
        }
    }

    /// A random key biased toward entries in sparsely-populated buckets
    /// (each non-empty bucket is equally likely to be chosen, regardless
    /// of its chain length) — cheap, and what callers wanting true
    /// uniformity should use [`Self::get_fair_random_key_with`] instead of.
    pub fn get_random_key_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }
        let total = self.total_slots();
        let mut offset = rng.gen_range(0..total);
        let (mut t, mut idx) = self.logical_slot(offset);
        while self.tables[t].buckets[idx].is_none() {
            offset = (offset + 1) % total;
            let (nt, nidx) = self.logical_slot(offset);
            t = nt;
            idx = nidx;
        }
        let head = self.tables[t].buckets[idx].as_deref();
        let len = chain_len(head);
        let pick = rng.gen_range(0..len);
        let entry = nth(head, pick);
        Some((&entry.key, &entry.value))
    }

    pub fn get_random_key(&self) -> Option<(&K, &V)> {
        self.get_random_key_with(&mut rand::thread_rng())
    }

    /// Bounded-work bulk sample: walks up to `min(count, total_slots())`
    /// buckets starting at a random offset, appending every entry in each
    /// visited (non-empty) bucket to `out`, and gives up early after
    /// skipping `10 * count` consecutive empty buckets. `out` is a
    /// multiset — a populous bucket can contribute more than one entry,
    /// and nothing here deduplicates across calls. Returns the number of
    /// entries appended.
    pub fn get_some_keys_with<'a, R: Rng + ?Sized>(
        &'a self,
        rng: &mut R,
        count: usize,
        out: &mut Vec<(&'a K, &'a V)>,
    ) -> usize {
        if count == 0 || self.is_empty() {
            return 0;
        }
        let total = self.total_slots();
        if total == 0 {
            return 0;
        }
        let buckets_to_visit = (count as u64).min(total);
        let max_empty_steps = (count as u64).saturating_mul(10).max(1);
        let mut visited = 0u64;
        let mut empty_steps = 0u64;
        let mut produced = 0usize;
        let mut offset = rng.gen_range(0..total);

        while visited < buckets_to_visit && empty_steps < max_empty_steps {
            let (t, idx) = self.logical_slot(offset);
            if let Some(head) = self.tables[t].buckets[idx].as_deref() {
                let mut cur = Some(head);
                while let Some(e) = cur {
                    out.push((&e.key, &e.value));
                    produced += 1;
                    cur = e.next.as_deref();
                }
                visited += 1;
            } else {
                empty_steps += 1;
            }
            offset = (offset + 1) % total;
        }
        produced
    }

    pub fn get_some_keys<'a>(&'a self, count: usize, out: &mut Vec<(&'a K, &'a V)>) -> usize {
        self.get_some_keys_with(&mut rand::thread_rng(), count, out)
    }

    /// An unbiased random key: samples up to 10 entries via
    /// [`Self::get_some_keys_with`] and picks uniformly among them.
    pub fn get_fair_random_key_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&K, &V)> {
        let mut buf = Vec::with_capacity(10);
        self.get_some_keys_with(rng, 10, &mut buf);
        if buf.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..buf.len());
        Some(buf[idx])
    }

    pub fn get_fair_random_key(&self) -> Option<(&K, &V)> {
        self.get_fair_random_key_with(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use crate::dict::{Dict, FxDictType};

    #[test]
    fn random_key_is_always_a_member() {
        let mut d: Dict<u32, u32, FxDictType> = Dict::create(FxDictType);
        for i in 0..50u32 {
            d.add(i, i * 2).unwrap();
        }
        for _ in 0..200 {
            let (k, v) = d.get_random_key().unwrap();
            assert_eq!(*v, *k * 2);
        }
    }

    #[test]
    fn some_keys_are_all_members_and_bounded() {
        let mut d: Dict<u32, u32, FxDictType> = Dict::create(FxDictType);
        for i in 0..50u32 {
            d.add(i, i).unwrap();
        }
        let mut out = Vec::new();
        let n = d.get_some_keys(10, &mut out);
        assert_eq!(n, out.len());
        assert!(!out.is_empty());
        for (k, v) in &out {
            assert_eq!(*k, *v);
        }
    }

    #[test]
    fn empty_dict_yields_no_random_key() {
        let d: Dict<u32, u32, FxDictType> = Dict::create(FxDictType);
        assert!(d.get_random_key().is_none());
        assert!(d.get_fair_random_key().is_none());
    }
}
