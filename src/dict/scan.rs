//! Cursor-stable full scan (`dictScan`): guarantees every key present for
//! the whole scan's duration is returned at least once, even across
//! resizes, by walking buckets in reverse-binary-increment order.

use super::entry::DictType;
use super::Dict;

impl<K: Eq, V, T: DictType<K, V>> Dict<K, V, T> {
    /// Visits one step of bucket(s) addressed by `cursor`, calling
    /// `bucket_fn(table, bucket_index)` once per bucket visited and
    /// `entry_fn(key, value)` once per entry in those buckets. Returns the
    /// next cursor to pass in, or `0` when the scan has covered every
    /// bucket.
    ///
    /// Start a scan with cursor `0` and stop when the returned cursor is
    /// `0` again (after at least one call) — not before, since `0` is also
    /// a perfectly valid starting cursor.
    pub fn scan<B, F>(&self, cursor: u64, mut bucket_fn: B, mut entry_fn: F) -> u64
    where
        B: FnMut(u8, usize),
        F: FnMut(&K, &V),
    {
        if self.tables[0].size_exp < 0 {
            return 0;
        }
        if !self.is_rehashing() {
            let mask = self.tables[0].mask() as u64;
            let bucket = (cursor & mask) as usize;
            bucket_fn(0, bucket);
            self.visit_bucket(0, bucket, &mut entry_fn);
            return rev_bits_increment(cursor, mask);
        }

        let (small, large) = if self.tables[0].capacity() <= self.tables[1].capacity() {
            (0usize, 1usize)
        } else {
            (1usize, 0usize)
        };
        let mask_small = self.tables[small].mask() as u64;
        let mask_large = self.tables[large].mask() as u64;
        let bucket_small = (cursor & mask_small) as usize;

        bucket_fn(small as u8, bucket_small);
        self.visit_bucket(small, bucket_small, &mut entry_fn);

        // Every larger-table bucket whose low bits match `bucket_small`
        // held (before the rehash started) the same keys as `bucket_small`
        // does now, so they all have to be visited together.
        let mut m = bucket_small as u64;
        loop {
            bucket_fn(large as u8, m as usize);
            self.visit_bucket(large, m as usize, &mut entry_fn);
            m += mask_small + 1;
            if m > mask_large {
                break;
            }
        }

        rev_bits_increment(cursor, mask_small)
    }

    fn visit_bucket<F: FnMut(&K, &V)>(&self, table: usize, idx: usize, f: &mut F) {
        let mut cur = self.tables[table].buckets[idx].as_deref();
        while let Some(e) = cur {
            f(&e.key, &e.value);
            cur = e.next.as_deref();
        }
    }
}

/// The reverse-binary cursor increment: pad `v`'s high bits with `!mask`,
/// reverse the full machine word, increment, reverse back. Equivalent to
/// incrementing the bits of `v & mask` as if they were read
/// most-significant-first.
fn rev_bits_increment(v: u64, mask: u64) -> u64 {
    let padded = v | !mask;
    let reversed = padded.reverse_bits();
    let incremented = reversed.wrapping_add(1);
    incremented.reverse_bits()
}

#[cfg(test)]
mod tests {
    use crate::dict::{Dict, FxDictType};
    use std::collections::HashSet;

    #[test]
    fn scan_visits_every_key_without_resize() {
        let mut d: Dict<u32, u32, FxDictType> = Dict::create(FxDictType);
        for i in 0..37u32 {
            d.add(i, i).unwrap();
        }
        let mut seen = HashSet::new();
        let mut cursor = 0u64;
        loop {
            cursor = d.scan(cursor, |_, _| {}, |k, _| {
                seen.insert(*k);
            });
            if cursor == 0 {
                break;
            }
        }
        assert_eq!(seen.len(), 37);
    }

    #[test]
    fn scan_survives_interleaved_growth() {
        let mut d: Dict<u32, u32, FxDictType> = Dict::create(FxDictType);
        for i in 0..8u32 {
            d.add(i, i).unwrap();
        }
        let mut seen = HashSet::new();
        let mut cursor = 0u64;
        let mut steps = 0;
        loop {
            cursor = d.scan(cursor, |_, _| {}, |k, _| {
                seen.insert(*k);
            });
            steps += 1;
            if steps == 2 {
                for i in 8..500u32 {
                    d.add(i, i).unwrap();
                }
            }
            if cursor == 0 {
                break;
            }
        }
        for i in 0..8u32 {
            assert!(seen.contains(&i), "original key {i} missing from scan");
        }
    }
}
