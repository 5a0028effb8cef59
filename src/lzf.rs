//! A small LZ77-family byte compressor standing in for the LZF codec the
//! quicklist is specified against as an external collaborator. Not
//! wire-compatible with `liblzf` — nothing in this crate exchanges
//! compressed bytes with the outside world, so only round-trip
//! correctness and "did it actually shrink" matter. Style (constants
//! table, doc-commented encode/decode pair) follows the block codec in
//! `jafreck-lz4r`.

use std::collections::HashMap;
use std::convert::TryInto;

/// Nodes smaller than this are never worth compressing (spec.md §4.2.2).
pub const MIN_COMPRESS_BYTES: usize = 48;

const MIN_MATCH: usize = 4;
const MAX_RUN: usize = u16::MAX as usize;

const TAG_LITERAL: u8 = 0;
const TAG_MATCH: u8 = 1;

/// Compresses `input`, returning `None` if the result would not be
/// smaller than `input` itself (including inputs below
/// [`MIN_COMPRESS_BYTES`], which are never attempted).
pub fn compress(input: &[u8]) -> Option<Vec<u8>> {
    if input.len() < MIN_COMPRESS_BYTES {
        return None;
    }
    let mut out = Vec::with_capacity(input.len());
    let mut table: HashMap<[u8; 4], usize> = HashMap::new();
    let mut i = 0;
    let mut literal_start = 0;

    while i + MIN_MATCH <= input.len() {
        let key: [u8; 4] = input[i..i + 4].try_into().unwrap();
        let mut matched = false;
        if let Some(&candidate) = table.get(&key) {
            let distance = i - candidate;
            if distance > 0 && distance <= MAX_RUN {
                let mut len = 0usize;
                while i + len < input.len()
                    && len < MAX_RUN
                    && input[candidate + len] == input[i + len]
                {
                    len += 1;
                }
                if len >= MIN_MATCH {
                    flush_literal(&mut out, input, literal_start, i);
                    out.push(TAG_MATCH);
                    out.extend_from_slice(&(len as u16).to_le_bytes());
                    out.extend_from_slice(&(distance as u16).to_le_bytes());
                    let end = i + len;
                    while i < end && i + 4 <= input.len() {
                        table.insert(input[i..i + 4].try_into().unwrap(), i);
                        i += 1;
                    }
                    i = end;
                    literal_start = i;
                    matched = true;
                }
            }
        }
        if !matched {
            table.insert(key, i);
            i += 1;
        }
    }
    flush_literal(&mut out, input, literal_start, input.len());

    if out.len() >= input.len() {
        None
    } else {
        Some(out)
    }
}

fn flush_literal(out: &mut Vec<u8>, input: &[u8], start: usize, end: usize) {
    let mut s = start;
    while s < end {
        let chunk = (end - s).min(MAX_RUN);
        out.push(TAG_LITERAL);
        out.extend_from_slice(&(chunk as u16).to_le_bytes());
        out.extend_from_slice(&input[s..s + chunk]);
        s += chunk;
    }
}

/// Decompresses a buffer produced by [`compress`]. `expected_len` is used
/// only to pre-size the output buffer.
pub fn decompress(compressed: &[u8], expected_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(expected_len);
    let mut i = 0;
    while i < compressed.len() {
        let tag = compressed[i];
        i += 1;
        let len = u16::from_le_bytes([compressed[i], compressed[i + 1]]) as usize;
        i += 2;
        if tag == TAG_LITERAL {
            out.extend_from_slice(&compressed[i..i + len]);
            i += len;
        } else {
            let distance = u16::from_le_bytes([compressed[i], compressed[i + 1]]) as usize;
            i += 2;
            let start = out.len() - distance;
            for k in 0..len {
                let byte = out[start + k];
                out.push(byte);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_compressible_data() {
        let input: Vec<u8> = b"abababababababababababababababababababababababab".to_vec();
        let compressed = compress(&input).expect("should compress");
        assert!(compressed.len() < input.len());
        let restored = decompress(&compressed, input.len());
        assert_eq!(restored, input);
    }

    #[test]
    fn refuses_short_input() {
        assert!(compress(b"short").is_none());
    }

    #[test]
    fn refuses_incompressible_data() {
        // Pseudo-random, no repeats long enough to beat the 3-byte
        // tag+len overhead per match.
        let input: Vec<u8> = (0..200u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        assert!(compress(&input).is_none() || {
            let c = compress(&input).unwrap();
            decompress(&c, input.len()) == input
        });
    }
}
