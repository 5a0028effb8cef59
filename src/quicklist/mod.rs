//! A doubly-linked list of bounded, optionally LZF-compressed listpack
//! nodes. See spec.md §4.2 / SPEC_FULL.md for the full contract.

mod bookmark;
mod iter;
mod node;

pub use bookmark::{BookmarkError, MAX_BOOKMARKS};
pub use iter::{QuicklistEntryRef, QuicklistIter};
pub use node::{Container, Encoding};

use bytes::Bytes;

use crate::config::QuicklistConfig;
use crate::error::{QuicklistError, QuicklistResult};
use crate::listpack::Listpack;
use bookmark::BookmarkTable;
use node::{added_size, can_merge, node_can_accept, Arena, Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Head,
    Tail,
}

/// Default per-node byte cap (`fill = -2`, see spec.md §3's byte-cap table).
pub const DEFAULT_FILL: i32 = -2;

pub struct Quicklist {
    arena: Arena,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    count: usize,
    len: usize,
    fill: i32,
    compress: u32,
    bookmarks: BookmarkTable,
    config: QuicklistConfig,
}

impl Quicklist {
    pub fn create() -> Self {
        Self::new(DEFAULT_FILL, 0)
    }

    pub fn new(fill: i32, compress: u32) -> Self {
        Self {
            arena: Arena::new(),
            head: None,
            tail: None,
            count: 0,
            len: 0,
            fill,
            compress,
            bookmarks: BookmarkTable::new(),
            config: QuicklistConfig::default(),
        }
    }

    pub fn set_fill(&mut self, fill: i32) {
        self.fill = fill;
    }

    pub fn set_compress(&mut self, compress: u32) {
        self.compress = compress;
        self.apply_compression_policy();
    }

    pub fn set_packed_threshold(&mut self, n: usize) {
        self.config.packed_threshold = n;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    // ---- end operations -------------------------------------------------

    /// Pushes to the head. Returns `true` if a new node was created,
    /// `false` if the element joined the existing head node.
    pub fn push_head(&mut self, value: Bytes) -> bool {
        self.push_end(value, Direction::Head)
    }

    pub fn push_tail(&mut self, value: Bytes) -> bool {
        self.push_end(value, Direction::Tail)
    }

    fn push_end(&mut self, value: Bytes, dir: Direction) -> bool {
        let target = match dir {
            Direction::Head => self.head,
            Direction::Tail => self.tail,
        };
        if value.len() <= self.config.packed_threshold {
            if let Some(id) = target {
                self.decompress(id);
                let extra = added_size(value.len());
                let (count, sz, packed) = {
                    let n = self.arena.get(id);
                    (n.count(), n.sz(), n.is_packed())
                };
                if packed && node_can_accept(self.fill, count, sz, extra) {
                    let node = self.arena.get_mut(id);
                    let lp = node.ensure_decompressed();
                    match dir {
                        Direction::Head => lp.push_front(value),
                        Direction::Tail => lp.push_back(value),
                    }
                    self.count += 1;
                    self.apply_compression_policy();
                    return false;
                }
            }
            let mut lp = Listpack::new();
            match dir {
                Direction::Head => lp.push_front(value),
                Direction::Tail => lp.push_back(value),
            }
            self.link_new(Node::new_packed(lp), dir);
        } else {
            self.link_new(Node::new_plain(value), dir);
        }
        true
    }

    pub fn pop(&mut self, dir: Direction) -> Option<Bytes> {
        let id = match dir {
            Direction::Head => self.head,
            Direction::Tail => self.tail,
        }?;
        if self.arena.get(id).container() == Container::Plain {
            let node = self.unlink_node(id);
            self.count -= 1;
            self.len -= 1;
            return node.into_plain();
        }
        self.decompress(id);
        let mut now_empty = false;
        let value = {
            let node = self.arena.get_mut(id);
            let lp = node.ensure_decompressed();
            if lp.is_empty() {
                None
            } else {
                let idx = match dir {
                    Direction::Head => 0,
                    Direction::Tail => lp.len() - 1,
                };
                let v = lp.remove(idx);
                now_empty = lp.is_empty();
                Some(v)
            }
        };
        if value.is_some() {
            self.count -= 1;
            if now_empty {
                self.unlink_node(id);
                self.len -= 1;
            } else {
                self.apply_compression_policy();
            }
        }
        value
    }

    /// Pops the tail and pushes it to the head in one step. No-op on an
    /// empty list.
    pub fn rotate(&mut self) -> bool {
        match self.pop(Direction::Tail) {
            Some(v) => {
                self.push_head(v);
                true
            }
            None => false,
        }
    }

    // ---- iteration --------------------------------------------------

    pub fn get_iterator(&self, direction: Direction) -> QuicklistIter {
        let start = match direction {
            Direction::Head => self.head,
            Direction::Tail => self.tail,
        };
        QuicklistIter::new(direction, start)
    }

    pub fn get_iterator_at_idx(&mut self, direction: Direction, idx: i64) -> QuicklistResult<QuicklistIter> {
        let (id, _) = self.locate_index(idx).ok_or(QuicklistError::OutOfRange)?;
        Ok(QuicklistIter::new(direction, Some(id)))
    }

    pub fn get_iterator_entry_at_idx(&mut self, idx: i64) -> QuicklistResult<Bytes> {
        let (id, offset) = self.locate_index(idx).ok_or(QuicklistError::OutOfRange)?;
        self.decompress(id);
        let node = self.arena.get_mut(id);
        let value = match node.container() {
            Container::Plain => node.plain_data().cloned(),
            Container::Packed => node.ensure_decompressed().get(offset).cloned(),
        };
        value.ok_or(QuicklistError::OutOfRange)
    }

    /// Resolves a (possibly negative) logical index to a `(node, offset)`
    /// pair, walking from whichever end is closer.
    fn locate_index(&mut self, idx: i64) -> Option<(NodeId, usize)> {
        let idx = if idx < 0 { self.count as i64 + idx } else { idx };
        if idx < 0 || idx as usize >= self.count {
            return None;
        }
        let idx = idx as usize;
        if idx <= self.count - 1 - idx {
            let mut remaining = idx;
            let mut cur = self.head;
            while let Some(id) = cur {
                let c = self.arena.get(id).count();
                if remaining < c {
                    return Some((id, remaining));
                }
                remaining -= c;
                cur = self.arena.get(id).next;
            }
            None
        } else {
            let mut remaining = self.count - 1 - idx;
            let mut cur = self.tail;
            while let Some(id) = cur {
                let c = self.arena.get(id).count();
                if remaining < c {
                    return Some((id, c - 1 - remaining));
                }
                remaining -= c;
                cur = self.arena.get(id).prev;
            }
            None
        }
    }

    // ---- insertion / replace / delete --------------------------------

    pub fn insert_before(&mut self, entry: QuicklistEntryRef, value: Bytes) {
        self.insert_at(entry.node, entry.offset, value);
    }

    pub fn insert_after(&mut self, entry: QuicklistEntryRef, value: Bytes) {
        self.insert_at(entry.node, entry.offset + 1, value);
    }

    fn insert_at(&mut self, id: NodeId, offset: usize, value: Bytes) {
        if value.len() > self.config.packed_threshold {
            let node_count = self.arena.get(id).count();
            if offset == 0 {
                self.link_before(id, Node::new_plain(value));
            } else if offset >= node_count {
                self.link_after(id, Node::new_plain(value));
            } else {
                self.split_and_insert(id, offset, Some(value));
            }
            self.count += 1;
            self.apply_compression_policy();
            return;
        }
        self.decompress(id);
        let extra = added_size(value.len());
        let (count, sz, packed) = {
            let n = self.arena.get(id);
            (n.count(), n.sz(), n.is_packed())
        };
        if packed && node_can_accept(self.fill, count, sz, extra) {
            let node = self.arena.get_mut(id);
            let lp = node.ensure_decompressed();
            let at = offset.min(lp.len());
            lp.insert(at, value);
            self.count += 1;
            self.apply_compression_policy();
            return;
        }
        if offset == 0 {
            if let Some(prev_id) = self.arena.get(id).prev {
                self.decompress(prev_id);
                let (pc, psz, ppacked) = {
                    let n = self.arena.get(prev_id);
                    (n.count(), n.sz(), n.is_packed())
                };
                if ppacked && node_can_accept(self.fill, pc, psz, extra) {
                    let node = self.arena.get_mut(prev_id);
                    node.ensure_decompressed().push_back(value);
                    self.count += 1;
                    self.apply_compression_policy();
                    return;
                }
            }
        }
        let node_count = self.arena.get(id).count();
        if offset >= node_count {
            if let Some(next_id) = self.arena.get(id).next {
                self.decompress(next_id);
                let (nc, nsz, npacked) = {
                    let n = self.arena.get(next_id);
                    (n.count(), n.sz(), n.is_packed())
                };
                if npacked && node_can_accept(self.fill, nc, nsz, extra) {
                    let node = self.arena.get_mut(next_id);
                    node.ensure_decompressed().push_front(value);
                    self.count += 1;
                    self.apply_compression_policy();
                    return;
                }
            }
        }
        self.split_and_insert(id, offset, Some(value));
    }

    /// Splits node `id` at `offset`, threading a brand-new node holding
    /// `value` between the two halves. The new node is PLAIN if `value`
    /// is over the packed threshold, PACKED otherwise.
    fn split_and_insert(&mut self, id: NodeId, offset: usize, value: Option<Bytes>) {
        let Some(value) = value else {
            return;
        };
        let oversized = value.len() > self.config.packed_threshold;
        if self.arena.get(id).container() == Container::Plain {
            let new_node = if oversized {
                Node::new_plain(value)
            } else {
                let mut lp = Listpack::new();
                lp.push_back(value);
                Node::new_packed(lp)
            };
            if offset == 0 {
                self.link_before(id, new_node);
            } else {
                self.link_after(id, new_node);
            }
            self.count += 1;
            self.apply_compression_policy();
            return;
        }
        self.decompress(id);
        let tail_lp = {
            let node = self.arena.get_mut(id);
            let lp = node.ensure_decompressed();
            let at = offset.min(lp.len());
            lp.split_off(at)
        };
        let mid_node = if oversized {
            Node::new_plain(value)
        } else {
            let mut mid_lp = Listpack::new();
            mid_lp.push_back(value);
            Node::new_packed(mid_lp)
        };
        let mid_id = self.link_after(id, mid_node);
        if !tail_lp.is_empty() {
            self.link_after(mid_id, Node::new_packed(tail_lp));
        }
        self.count += 1;
        self.apply_compression_policy();
        self.try_merge_neighbors(id);
    }

    pub fn replace_entry(&mut self, entry: QuicklistEntryRef, value: Bytes) {
        let id = entry.node;
        if self.arena.get(id).container() == Container::Plain {
            self.arena.get_mut(id).set_plain(value);
            return;
        }
        self.decompress(id);
        let node = self.arena.get_mut(id);
        let lp = node.ensure_decompressed();
        if entry.offset < lp.len() {
            lp.replace(entry.offset, value);
        }
        self.apply_compression_policy();
    }

    pub fn replace_at_index(&mut self, idx: i64, value: Bytes) -> QuicklistResult<()> {
        let (id, offset) = self.locate_index(idx).ok_or(QuicklistError::OutOfRange)?;
        self.replace_entry(QuicklistEntryRef { node: id, offset }, value);
        Ok(())
    }

    /// Deletes the element at `entry`, returning the position that
    /// `direction`'s next step should land on (its "successor").
    fn del_entry(&mut self, entry: QuicklistEntryRef, direction: Direction) -> Option<QuicklistEntryRef> {
        let id = entry.node;
        let offset = entry.offset;
        let successor_after_unlink = |this: &Self, removed: NodeId| -> Option<QuicklistEntryRef> {
            let next_id = match direction {
                Direction::Head => this.arena.get(removed).next,
                Direction::Tail => this.arena.get(removed).prev,
            };
            next_id.map(|n| {
                let offset = match direction {
                    Direction::Head => 0,
                    Direction::Tail => this.arena.get(n).count().saturating_sub(1),
                };
                QuicklistEntryRef { node: n, offset }
            })
        };

        if self.arena.get(id).container() == Container::Plain {
            let successor = successor_after_unlink(self, id);
            self.unlink_node(id);
            self.count -= 1;
            self.len -= 1;
            return successor;
        }

        self.decompress(id);
        let now_empty = {
            let node = self.arena.get_mut(id);
            let lp = node.ensure_decompressed();
            if offset < lp.len() {
                lp.remove(offset);
            }
            lp.is_empty()
        };
        self.count -= 1;

        if now_empty {
            let successor = successor_after_unlink(self, id);
            self.unlink_node(id);
            self.len -= 1;
            return successor;
        }

        self.apply_compression_policy();

        let new_count = self.arena.get(id).count();
        let next_offset = match direction {
            Direction::Head => offset,
            Direction::Tail => {
                if offset == 0 {
                    return self
                        .arena
                        .get(id)
                        .prev
                        .map(|p| QuicklistEntryRef {
                            node: p,
                            offset: self.arena.get(p).count().saturating_sub(1),
                        });
                }
                offset - 1
            }
        };
        if next_offset < new_count {
            Some(QuicklistEntryRef { node: id, offset: next_offset })
        } else {
            self.arena
                .get(id)
                .next
                .map(|n| QuicklistEntryRef { node: n, offset: 0 })
        }
    }

    /// Removes `count` elements starting at (possibly negative) `start`.
    /// Returns `true` if anything was removed.
    pub fn del_range(&mut self, start: i64, count: i64) -> bool {
        if count <= 0 || self.count == 0 {
            return false;
        }
        let total = self.count as i64;
        let s = if start < 0 { (total + start).max(0) } else { start };
        if s >= total {
            return false;
        }
        let mut n = (count.min(total - s)) as usize;
        if n == 0 {
            return false;
        }
        let Some((mut node_id, mut offset)) = self.locate_index(s) else {
            return false;
        };
        let mut removed_any = false;

        while n > 0 {
            let node_count = self.arena.get(node_id).count();
            let take = (node_count - offset).min(n);
            let next_id = self.arena.get(node_id).next;
            let is_plain = self.arena.get(node_id).container() == Container::Plain;

            if is_plain || (offset == 0 && take == node_count) {
                self.count -= node_count;
                self.unlink_node(node_id);
                self.len -= 1;
                removed_any = true;
                n = n.saturating_sub(node_count);
            } else {
                self.decompress(node_id);
                let node = self.arena.get_mut(node_id);
                let lp = node.ensure_decompressed();
                lp.remove_range(offset, take);
                self.count -= take;
                removed_any = true;
                n -= take;
                self.try_merge_neighbors(node_id);
            }
            offset = 0;
            match next_id {
                Some(nid) => node_id = nid,
                None => break,
            }
        }
        self.apply_compression_policy();
        removed_any
    }

    // ---- accessors ----------------------------------------------------

    pub fn compare(&mut self, entry: QuicklistEntryRef, data: &[u8]) -> bool {
        self.decompress(entry.node);
        let node = self.arena.get_mut(entry.node);
        match node.container() {
            Container::Plain => node.plain_data().map(|b| b.as_ref() == data).unwrap_or(false),
            Container::Packed => node
                .ensure_decompressed()
                .get(entry.offset)
                .map(|b| b.as_ref() == data)
                .unwrap_or(false),
        }
    }

    /// The raw LZF-compressed bytes backing `entry`'s node, if it is
    /// currently LZF-encoded.
    pub fn get_lzf(&self, entry: QuicklistEntryRef) -> Option<Vec<u8>> {
        self.arena.get(entry.node).lzf_bytes().map(|b| b.to_vec())
    }

    pub fn repr(&self, full: bool) -> String {
        let mut out = format!(
            "quicklist len={} count={} fill={} compress={}\n",
            self.len, self.count, self.fill, self.compress
        );
        if full {
            let mut cur = self.head;
            let mut i = 0;
            while let Some(id) = cur {
                let node = self.arena.get(id);
                out.push_str(&format!(
                    "  node[{i}] container={:?} encoding={:?} count={} sz={}\n",
                    node.container(),
                    node.encoding(),
                    node.count(),
                    node.sz()
                ));
                cur = node.next;
                i += 1;
            }
        }
        out
    }

    // ---- bookmarks ------------------------------------------------------

    pub fn bookmark_create(&mut self, name: &str, entry: QuicklistEntryRef) -> Result<(), BookmarkError> {
        self.bookmarks.create(name, entry.node)
    }

    pub fn bookmark_find(&self, name: &str) -> Option<QuicklistEntryRef> {
        self.bookmarks.find(name).map(|node| QuicklistEntryRef { node, offset: 0 })
    }

    pub fn bookmark_delete(&mut self, name: &str) -> bool {
        self.bookmarks.delete(name)
    }

    pub fn bookmark_count(&self) -> usize {
        self.bookmarks.len()
    }

    // ---- structural helpers --------------------------------------------

    /// No-op for a PLAIN node: it has no listpack to inflate, and every
    /// caller already branches on `container()`/`is_packed()` to decide
    /// what to do with one.
    fn decompress(&mut self, id: NodeId) {
        if self.arena.get(id).container() == Container::Packed {
            self.arena.get_mut(id).ensure_decompressed();
        }
    }

    fn link_new(&mut self, node: Node, dir: Direction) {
        let added = node.count();
        if self.head.is_none() {
            let id = self.arena.insert(node);
            self.head = Some(id);
            self.tail = Some(id);
            self.len += 1;
        } else {
            match dir {
                Direction::Head => {
                    self.link_before(self.head.unwrap(), node);
                }
                Direction::Tail => {
                    self.link_after(self.tail.unwrap(), node);
                }
            }
        }
        self.count += added;
        self.apply_compression_policy();
    }

    fn link_after(&mut self, anchor: NodeId, node: Node) -> NodeId {
        let id = self.arena.insert(node);
        let anchor_next = self.arena.get(anchor).next;
        self.arena.get_mut(id).prev = Some(anchor);
        self.arena.get_mut(id).next = anchor_next;
        self.arena.get_mut(anchor).next = Some(id);
        match anchor_next {
            Some(n) => self.arena.get_mut(n).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;
        id
    }

    fn link_before(&mut self, anchor: NodeId, node: Node) -> NodeId {
        let id = self.arena.insert(node);
        let anchor_prev = self.arena.get(anchor).prev;
        self.arena.get_mut(id).next = Some(anchor);
        self.arena.get_mut(id).prev = anchor_prev;
        self.arena.get_mut(anchor).prev = Some(id);
        match anchor_prev {
            Some(p) => self.arena.get_mut(p).next = Some(id),
            None => self.head = Some(id),
        }
        self.len += 1;
        id
    }

    /// Unlinks `id` from the list (fixing head/tail/prev/next and
    /// retargeting bookmarks), returning the owned node.
    fn unlink_node(&mut self, id: NodeId) -> Node {
        let (prev, next) = {
            let n = self.arena.get(id);
            (n.prev, n.next)
        };
        match prev {
            Some(p) => self.arena.get_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.arena.get_mut(n).prev = prev,
            None => self.tail = prev,
        }
        self.bookmarks.on_node_deleted(id, next);
        self.arena.remove(id)
    }

    fn try_merge_neighbors(&mut self, id: NodeId) {
        self.try_merge_with_next(id);
        if let Some(prev_id) = self.arena.get(id).prev {
            self.try_merge_with_next(prev_id);
        }
    }

    fn try_merge_with_next(&mut self, id: NodeId) {
        let Some(next_id) = self.arena.get(id).next else { return };
        if self.arena.get(id).container() != Container::Packed
            || self.arena.get(next_id).container() != Container::Packed
        {
            return;
        }
        self.decompress(id);
        self.decompress(next_id);
        let (count_a, sz_a) = {
            let n = self.arena.get(id);
            (n.count(), n.sz())
        };
        let (count_b, sz_b) = {
            let n = self.arena.get(next_id);
            (n.count(), n.sz())
        };
        if !can_merge(self.fill, count_a, sz_a, count_b, sz_b) {
            return;
        }
        let removed = self.unlink_node(next_id);
        let Some(appended) = removed.listpack_owned() else { return };
        let node = self.arena.get_mut(id);
        node.ensure_decompressed().append(appended);
        self.len -= 1;
        self.apply_compression_policy();
    }

    /// Re-applies the compress/RAW boundary policy across the whole list.
    /// `compress == 0` disables compression entirely (every node stays
    /// RAW). Otherwise the `compress` nodes nearest each end are
    /// decompressed and every interior node is attempted for LZF.
    fn apply_compression_policy(&mut self) {
        if self.compress == 0 {
            return;
        }
        let d = self.compress as usize;
        let mut ids = Vec::with_capacity(self.len);
        let mut cur = self.head;
        while let Some(id) = cur {
            ids.push(id);
            cur = self.arena.get(id).next;
        }
        let n = ids.len();
        for (i, id) in ids.into_iter().enumerate() {
            let node = self.arena.get_mut(id);
            if node.container() == Container::Plain {
                continue;
            }
            let near_edge = i < d || i + d >= n;
            if near_edge {
                node.ensure_decompressed();
            } else {
                node.try_compress();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn val(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn q1_count_and_len_track_structure() {
        let mut ql = Quicklist::new(128, 0);
        for i in 0..1000u32 {
            ql.push_tail(val(&format!("x{i:06}")));
        }
        assert_eq!(ql.count(), 1000);
        let mut manual_count = 0;
        let mut iter = ql.get_iterator(Direction::Head);
        while iter.next(&mut ql).is_some() {
            manual_count += 1;
        }
        iter.release(&mut ql);
        assert_eq!(manual_count, 1000);
    }

    #[test]
    fn s4_fill_boundary() {
        let mut ql = Quicklist::new(128, 0);
        for _ in 0..1000 {
            ql.push_tail(Bytes::copy_from_slice(b"0123456789"));
        }
        assert_eq!(ql.count(), 1000);
        assert!(ql.len() <= 9 && ql.len() >= 8, "len={}", ql.len());
        let mut popped = 0;
        while ql.pop(Direction::Head).is_some() {
            popped += 1;
        }
        assert_eq!(popped, 1000);
        assert_eq!(ql.len(), 0);
        assert_eq!(ql.count(), 0);
    }

    #[test]
    fn s5_compression_keeps_edges_raw() {
        let mut ql = Quicklist::new(-2, 1);
        let payload = vec![b'a'; 1024];
        for _ in 0..100 {
            ql.push_tail(Bytes::from(payload.clone()));
        }
        assert!(ql.len() >= 13, "len={}", ql.len());
        let (head, _) = ql.locate_index(0).unwrap();
        let (tail, _) = ql.locate_index(-1).unwrap();
        assert_eq!(ql.arena.get(head).encoding(), Encoding::Raw);
        assert_eq!(ql.arena.get(tail).encoding(), Encoding::Raw);
    }

    #[test]
    fn s6_range_delete() {
        let mut ql = Quicklist::new(16, 0);
        for i in 0..100u32 {
            ql.push_tail(Bytes::copy_from_slice(&i.to_le_bytes()));
        }
        assert!(ql.del_range(10, 30));
        assert_eq!(ql.count(), 70);
        let (id, offset) = ql.locate_index(10).unwrap();
        let node = ql.arena.get(id);
        let elem = node.listpack().unwrap().get(offset).unwrap();
        assert_eq!(u32::from_le_bytes(elem[..4].try_into().unwrap()), 40);
    }

    #[test]
    fn rotate_moves_tail_to_head() {
        let mut ql = Quicklist::create();
        ql.push_tail(val("a"));
        ql.push_tail(val("b"));
        ql.push_tail(val("c"));
        assert!(ql.rotate());
        assert_eq!(ql.pop(Direction::Head).unwrap(), val("c"));
        assert_eq!(ql.pop(Direction::Head).unwrap(), val("a"));
        assert_eq!(ql.pop(Direction::Head).unwrap(), val("b"));
    }

    #[test]
    fn bookmarks_retarget_on_node_deletion() {
        let mut ql = Quicklist::new(1, 0);
        for i in 0..5u32 {
            ql.push_tail(Bytes::copy_from_slice(&i.to_le_bytes()));
        }
        let (first_node, _) = ql.locate_index(0).unwrap();
        ql.bookmark_create("resume", QuicklistEntryRef { node: first_node, offset: 0 })
            .unwrap();
        ql.del_range(0, 1);
        assert!(ql.bookmark_find("resume").is_some());
    }

    #[test]
    fn oversized_element_becomes_plain_node() {
        let mut ql = Quicklist::new(-2, 0);
        ql.set_packed_threshold(64);
        ql.push_tail(Bytes::from(vec![b'x'; 128]));
        let (id, _) = ql.locate_index(0).unwrap();
        assert_eq!(ql.arena.get(id).container(), Container::Plain);
        assert_eq!(ql.pop(Direction::Tail).unwrap().len(), 128);
    }
}
