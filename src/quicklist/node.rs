//! The quicklist's node arena: an ownership-strict stand-in for the
//! original's `prev`/`next` raw pointers, per spec.md §9's own
//! recommendation — nodes live in a `Vec<Option<Node>>` addressed by a
//! small `NodeId` index newtype, with a free list for reuse after removal.

use bytes::Bytes;

use crate::listpack::{self, Listpack};
use crate::lzf;

/// Byte cap applied to every PACKED node regardless of `fill`, matching
/// `SIZE_SAFETY_LIMIT` in the original.
pub(crate) const SIZE_SAFETY_LIMIT: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    Lzf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Plain,
    Packed,
}

pub(crate) enum NodeBody {
    Packed(Listpack),
    PackedCompressed {
        uncompressed_sz: usize,
        count: usize,
        data: Vec<u8>,
    },
    Plain(Bytes),
}

pub(crate) struct Node {
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    body: NodeBody,
    pub(crate) recompress: bool,
    pub(crate) attempted_compress: bool,
}

impl Node {
    pub(crate) fn new_packed(lp: Listpack) -> Self {
        Self {
            prev: None,
            next: None,
            body: NodeBody::Packed(lp),
            recompress: false,
            attempted_compress: false,
        }
    }

    pub(crate) fn new_plain(data: Bytes) -> Self {
        Self {
            prev: None,
            next: None,
            body: NodeBody::Plain(data),
            recompress: false,
            attempted_compress: false,
        }
    }

    pub(crate) fn container(&self) -> Container {
        match self.body {
            NodeBody::Plain(_) => Container::Plain,
            _ => Container::Packed,
        }
    }

    pub(crate) fn encoding(&self) -> Encoding {
        match self.body {
            NodeBody::PackedCompressed { .. } => Encoding::Lzf,
            _ => Encoding::Raw,
        }
    }

    pub(crate) fn count(&self) -> usize {
        match &self.body {
            NodeBody::Packed(lp) => lp.len(),
            NodeBody::PackedCompressed { count, .. } => *count,
            NodeBody::Plain(_) => 1,
        }
    }

    pub(crate) fn sz(&self) -> usize {
        match &self.body {
            NodeBody::Packed(lp) => lp.byte_len(),
            NodeBody::PackedCompressed { uncompressed_sz, .. } => *uncompressed_sz,
            NodeBody::Plain(data) => data.len(),
        }
    }

    pub(crate) fn plain_data(&self) -> Option<&Bytes> {
        match &self.body {
            NodeBody::Plain(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn lzf_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            NodeBody::PackedCompressed { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Ensures the node's payload is an in-memory [`Listpack`], inflating
    /// it from its LZF-compressed form if needed. Sets `recompress` so a
    /// later policy pass knows to re-compress it once the caller is done.
    pub(crate) fn ensure_decompressed(&mut self) -> &mut Listpack {
        if let NodeBody::PackedCompressed {
            uncompressed_sz,
            data,
            ..
        } = &self.body
        {
            let raw = lzf::decompress(data, *uncompressed_sz);
            let lp = Listpack::from_bytes(&raw);
            self.recompress = true;
            self.body = NodeBody::Packed(lp);
        }
        match &mut self.body {
            NodeBody::Packed(lp) => lp,
            _ => unreachable!("PLAIN node has no listpack"),
        }
    }

    pub(crate) fn listpack(&self) -> Option<&Listpack> {
        match &self.body {
            NodeBody::Packed(lp) => Some(lp),
            _ => None,
        }
    }

    /// Attempts to LZF-compress a PACKED node's listpack in place. A no-op
    /// for nodes that are PLAIN, already compressed, too small
    /// ([`lzf::MIN_COMPRESS_BYTES`]), or that don't shrink — all three
    /// outcomes still set `attempted_compress`, matching spec.md §4.2.2.
    pub(crate) fn try_compress(&mut self) {
        if let NodeBody::Packed(lp) = &self.body {
            let flat = lp.to_bytes();
            self.attempted_compress = true;
            if let Some(compressed) = lzf::compress(&flat) {
                let count = lp.len();
                self.body = NodeBody::PackedCompressed {
                    uncompressed_sz: flat.len(),
                    count,
                    data: compressed,
                };
            }
        }
    }

    pub(crate) fn is_packed(&self) -> bool {
        matches!(self.body, NodeBody::Packed(_) | NodeBody::PackedCompressed { .. })
    }

    /// Consumes a PLAIN node, returning its buffer. `None` for PACKED nodes.
    pub(crate) fn into_plain(self) -> Option<Bytes> {
        match self.body {
            NodeBody::Plain(data) => Some(data),
            _ => None,
        }
    }

    /// Overwrites a PLAIN node's buffer in place.
    pub(crate) fn set_plain(&mut self, value: Bytes) {
        self.body = NodeBody::Plain(value);
    }

    /// Consumes a PACKED node, returning its (decompressed) listpack.
    pub(crate) fn listpack_owned(mut self) -> Option<Listpack> {
        self.ensure_decompressed();
        match self.body {
            NodeBody::Packed(lp) => Some(lp),
            _ => None,
        }
    }
}

/// Marginal listpack byte cost of pushing one more `value`-sized element.
pub(crate) fn added_size(value_len: usize) -> usize {
    value_len + listpack::ELEMENT_OVERHEAD
}

fn byte_cap_for_fill(fill: i32) -> usize {
    match fill {
        -1 => 4 * 1024,
        -2 => 8 * 1024,
        -3 => 16 * 1024,
        -4 => 32 * 1024,
        _ => 64 * 1024, // -5 and anything more negative clamp to the largest bucket
    }
}

/// Whether a node currently holding `count` elements totaling `sz` bytes
/// may accept one more element adding `extra` bytes, under `fill`.
pub(crate) fn node_can_accept(fill: i32, count: usize, sz: usize, extra: usize) -> bool {
    let new_sz = sz + extra;
    if fill >= 0 {
        let new_count = count + 1;
        (new_count as i64) <= (fill as i64) && new_sz <= SIZE_SAFETY_LIMIT && new_sz <= u16::MAX as usize
    } else {
        new_sz <= byte_cap_for_fill(fill)
    }
}

/// Whether two adjacent packed nodes' contents would fit in a single node
/// under `fill`, used by merge-on-shrink after a deletion splits a node
/// down to nothing worth keeping separate.
pub(crate) fn can_merge(fill: i32, count_a: usize, sz_a: usize, count_b: usize, sz_b: usize) -> bool {
    let combined_count = count_a + count_b;
    let combined_sz = sz_a + sz_b;
    if fill >= 0 {
        (combined_count as i64) <= (fill as i64)
            && combined_sz <= SIZE_SAFETY_LIMIT
            && combined_sz <= u16::MAX as usize
    } else {
        combined_sz <= byte_cap_for_fill(fill)
    }
}

/// An arena of [`Node`]s addressed by [`NodeId`], with slot reuse.
pub(crate) struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Node {
        let node = self.slots[id.0].take().expect("NodeId double free");
        self.free.push(id.0);
        node
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        self.slots[id.0].as_ref().expect("stale NodeId")
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0].as_mut().expect("stale NodeId")
    }
}
