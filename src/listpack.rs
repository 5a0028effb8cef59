//! A minimal packed-element container standing in for the listpack the
//! quicklist is specified against as an external collaborator (spec.md
//! §1 lists it out of scope, but nothing else in this crate can supply
//! it, so a small from-scratch version lives here instead of a stub).
//!
//! Backed by a `Vec<Bytes>` rather than one contiguous byte buffer — the
//! actual wire layout (7-bit/backlen-encoded entries) is exactly the part
//! the original spec calls out of scope, so only the contract that
//! matters to the quicklist is kept: O(end) push/pop, indexed access,
//! iteration, and a byte-size estimate usable for fill-policy accounting.

use bytes::Bytes;

/// Per-element bookkeeping overhead folded into `byte_len`, approximating
/// a listpack entry's length-prefix + backlen bytes.
pub(crate) const ELEMENT_OVERHEAD: usize = 11;

/// Header overhead folded into every listpack's `byte_len`, approximating
/// the total-bytes + num-elements header fields.
const HEADER_OVERHEAD: usize = 6;

#[derive(Debug, Clone)]
pub(crate) struct Listpack {
    elements: Vec<Bytes>,
    byte_len: usize,
}

impl Listpack {
    pub(crate) fn new() -> Self {
        Self {
            elements: Vec::new(),
            byte_len: HEADER_OVERHEAD,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&Bytes> {
        self.elements.get(idx)
    }

    pub(crate) fn push_back(&mut self, elem: Bytes) {
        self.byte_len += Self::encoded_len(&elem);
        self.elements.push(elem);
    }

    pub(crate) fn push_front(&mut self, elem: Bytes) {
        self.byte_len += Self::encoded_len(&elem);
        self.elements.insert(0, elem);
    }

    pub(crate) fn insert(&mut self, idx: usize, elem: Bytes) {
        self.byte_len += Self::encoded_len(&elem);
        self.elements.insert(idx, elem);
    }

    pub(crate) fn remove(&mut self, idx: usize) -> Bytes {
        let elem = self.elements.remove(idx);
        self.byte_len -= Self::encoded_len(&elem);
        elem
    }

    pub(crate) fn remove_range(&mut self, start: usize, len: usize) {
        for elem in self.elements.drain(start..start + len) {
            self.byte_len -= Self::encoded_len(&elem);
        }
    }

    pub(crate) fn replace(&mut self, idx: usize, elem: Bytes) {
        let old = std::mem::replace(&mut self.elements[idx], elem);
        self.byte_len -= Self::encoded_len(&old);
        self.byte_len += Self::encoded_len(&self.elements[idx]);
    }

    /// Splits off every element from `at` onward into a new listpack,
    /// retaining `[0, at)` in `self` — used when a quicklist node must be
    /// cut in two.
    pub(crate) fn split_off(&mut self, at: usize) -> Listpack {
        let tail = self.elements.split_off(at);
        let mut other = Listpack::new();
        for elem in tail {
            other.push_back(elem);
        }
        self.byte_len = HEADER_OVERHEAD
            + self
                .elements
                .iter()
                .map(Self::encoded_len)
                .sum::<usize>();
        other
    }

    /// Moves every element of `other` onto the end of `self`.
    pub(crate) fn append(&mut self, other: Listpack) {
        for elem in other.elements {
            self.push_back(elem);
        }
    }

    fn encoded_len(elem: &Bytes) -> usize {
        elem.len() + ELEMENT_OVERHEAD
    }

    /// A flat serialization (`u32` length prefix + bytes, per element)
    /// used only as the input to LZF compression — not a public format.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len);
        for elem in &self.elements {
            out.extend_from_slice(&(elem.len() as u32).to_le_bytes());
            out.extend_from_slice(elem);
        }
        out
    }

    pub(crate) fn from_bytes(buf: &[u8]) -> Self {
        let mut lp = Listpack::new();
        let mut i = 0;
        while i + 4 <= buf.len() {
            let len = u32::from_le_bytes(buf[i..i + 4].try_into().unwrap()) as usize;
            i += 4;
            lp.push_back(Bytes::copy_from_slice(&buf[i..i + len]));
            i += len;
        }
        lp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_index() {
        let mut lp = Listpack::new();
        lp.push_back(Bytes::from_static(b"a"));
        lp.push_back(Bytes::from_static(b"b"));
        lp.push_front(Bytes::from_static(b"z"));
        assert_eq!(lp.len(), 3);
        assert_eq!(lp.get(0).unwrap(), &Bytes::from_static(b"z"));
        assert_eq!(lp.get(2).unwrap(), &Bytes::from_static(b"b"));
    }

    #[test]
    fn split_and_append_roundtrip() {
        let mut lp = Listpack::new();
        for i in 0..10u8 {
            lp.push_back(Bytes::copy_from_slice(&[i]));
        }
        let tail = lp.split_off(6);
        assert_eq!(lp.len(), 6);
        assert_eq!(tail.len(), 4);
        lp.append(tail);
        assert_eq!(lp.len(), 10);
        for i in 0..10u8 {
            assert_eq!(lp.get(i as usize).unwrap()[0], i);
        }
    }

    #[test]
    fn byte_serialization_roundtrip() {
        let mut lp = Listpack::new();
        lp.push_back(Bytes::from_static(b"hello"));
        lp.push_back(Bytes::from_static(b"world"));
        let bytes = lp.to_bytes();
        let restored = Listpack::from_bytes(&bytes);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get(0).unwrap(), &Bytes::from_static(b"hello"));
        assert_eq!(restored.get(1).unwrap(), &Bytes::from_static(b"world"));
    }
}
