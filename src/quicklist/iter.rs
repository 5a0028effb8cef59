//! Quicklist iteration. Like [`crate::dict::DictCursor`], the iterator is
//! a plain value that doesn't borrow the quicklist between steps — each
//! `next` call takes `&mut Quicklist` explicitly, which is also what lets
//! it recompress a node it's leaving without fighting the borrow checker.

use bytes::Bytes;

use super::node::{Container, NodeId};
use super::{Direction, Quicklist};

/// An opaque reference to one element's current position, handed out by
/// [`QuicklistIter::entry`] and consumed by `del_entry`/`replace_entry`/
/// `insert_before`/`insert_after`/bookmark creation.
#[derive(Clone, Copy, Debug)]
pub struct QuicklistEntryRef {
    pub(crate) node: NodeId,
    pub(crate) offset: usize,
}

pub struct QuicklistIter {
    direction: Direction,
    node: Option<NodeId>,
    /// Offset of the *next* element to return, or `-1` meaning "start of
    /// node in the iteration direction" (resolved lazily so a fresh
    /// iterator doesn't need to know the node's count up front).
    offset: i64,
    current: Option<(NodeId, usize)>,
}

impl QuicklistIter {
    pub(crate) fn new(direction: Direction, node: Option<NodeId>) -> Self {
        Self {
            direction,
            node,
            offset: -1,
            current: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.offset = -1;
    }

    /// The position of the element most recently returned by `next`, if
    /// any — the handle `del_entry`/`replace_entry`/`insert_before`/
    /// `insert_after` expect.
    pub fn entry(&self) -> Option<QuicklistEntryRef> {
        self.current
            .map(|(node, offset)| QuicklistEntryRef { node, offset })
    }

    pub fn next(&mut self, ql: &mut Quicklist) -> Option<Bytes> {
        loop {
            let id = self.node?;
            ql.decompress(id);
            let n_count = ql.arena.get(id).count();
            if n_count == 0 {
                self.advance_node(ql, id);
                continue;
            }
            let idx = match self.direction {
                Direction::Head => {
                    if self.offset < 0 {
                        0
                    } else {
                        self.offset as usize
                    }
                }
                Direction::Tail => {
                    if self.offset < 0 {
                        n_count - 1
                    } else {
                        self.offset as usize
                    }
                }
            };
            if idx >= n_count {
                self.advance_node(ql, id);
                continue;
            }
            let node = ql.arena.get_mut(id);
            let value = match node.container() {
                Container::Plain => node.plain_data().cloned(),
                Container::Packed => node.ensure_decompressed().get(idx).cloned(),
            };
            self.current = Some((id, idx));
            match self.direction {
                Direction::Head => {
                    if idx + 1 >= n_count {
                        self.advance_node(ql, id);
                    } else {
                        self.offset = (idx + 1) as i64;
                    }
                }
                Direction::Tail => {
                    if idx == 0 {
                        self.advance_node(ql, id);
                    } else {
                        self.offset = (idx - 1) as i64;
                    }
                }
            }
            return value;
        }
    }

    fn advance_node(&mut self, ql: &mut Quicklist, left: NodeId) {
        ql.apply_compression_policy();
        let next = match self.direction {
            Direction::Head => ql.arena.get(left).next,
            Direction::Tail => ql.arena.get(left).prev,
        };
        self.node = next;
        self.offset = -1;
    }

    /// Deletes the element last returned by `next`, positioning the
    /// iterator so the following `next` call yields its successor.
    pub fn del_entry(&mut self, ql: &mut Quicklist) {
        let Some(entry) = self.entry() else { return };
        let successor = ql.del_entry(entry, self.direction);
        self.current = None;
        match successor {
            Some(s) => {
                self.node = Some(s.node);
                self.offset = s.offset as i64;
            }
            None => {
                self.node = None;
                self.offset = -1;
            }
        }
    }

    /// Releases the iterator, recompressing whatever node it was last
    /// sitting on per policy.
    pub fn release(self, ql: &mut Quicklist) {
        ql.apply_compression_policy();
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn forward_iteration_matches_push_order() {
        let mut ql = Quicklist::create();
        for i in 0..50u8 {
            ql.push_tail(bytes::Bytes::copy_from_slice(&[i]));
        }
        let mut iter = ql.get_iterator(Direction::Head);
        for i in 0..50u8 {
            assert_eq!(iter.next(&mut ql).unwrap()[0], i);
        }
        assert!(iter.next(&mut ql).is_none());
        iter.release(&mut ql);
    }

    #[test]
    fn reverse_iteration_matches_push_order() {
        let mut ql = Quicklist::create();
        for i in 0..50u8 {
            ql.push_tail(bytes::Bytes::copy_from_slice(&[i]));
        }
        let mut iter = ql.get_iterator(Direction::Tail);
        for i in (0..50u8).rev() {
            assert_eq!(iter.next(&mut ql).unwrap()[0], i);
        }
        iter.release(&mut ql);
    }

    #[test]
    fn del_entry_skips_to_successor() {
        let mut ql = Quicklist::create();
        for i in 0..10u8 {
            ql.push_tail(bytes::Bytes::copy_from_slice(&[i]));
        }
        let mut iter = ql.get_iterator(Direction::Head);
        // Advance to element 3.
        for _ in 0..4 {
            iter.next(&mut ql);
        }
        iter.del_entry(&mut ql);
        assert_eq!(iter.next(&mut ql).unwrap()[0], 4);
        assert_eq!(ql.count(), 9);
        iter.release(&mut ql);
    }
}
