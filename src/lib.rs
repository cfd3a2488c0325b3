//! taxodb - A strict, deterministic, in-process categorical row-indexing engine
//!
//! Rows are implicit positions in a shared domain `[0, size)`. Named
//! categories partition that domain into mutually-exclusive labels, each
//! label backed by a packed bitset marking the rows it covers. Queries
//! compose those bitsets (OR within a category, AND across categories);
//! structural edits (keep, resize, append, collapse) rewrite them in place.

pub mod bits;
pub mod buffer;
pub mod locator;
pub mod multimap;
pub mod observability;
pub mod registry;
