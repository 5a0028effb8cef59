//! Two in-memory core data structures modeled on Redis's incrementally
//! rehashing hash table and its quicklist element list: [`dict::Dict`], a
//! generic `K -> V` hash dictionary that grows its table a few buckets at
//! a time instead of stopping the world, and [`quicklist::Quicklist`], a
//! doubly-linked list of compact, optionally LZF-compressed nodes.

/// The incrementally-rehashing hash dictionary.
pub mod dict;
/// The node-chunked doubly-linked list.
pub mod quicklist;

/// Resize and compression policy knobs shared by both structures.
pub mod config;
/// Error types returned by fallible operations.
pub mod error;

mod listpack;
mod lzf;

pub use dict::Dict;
pub use quicklist::Quicklist;
