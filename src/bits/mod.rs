//! Packed bitsets for taxodb
//!
//! A [`BitArray`] is a boolean vector packed into 32-bit words, backed by
//! the buffer layer. The index engine stores one per label (its
//! "indicator") and composes them with the word-level boolean algebra
//! defined here.
//!
//! # Design Principles
//!
//! - Bit `i` lives in word `i / 32`, position `i % 32`
//! - Padding bits past the logical length are never trusted: `sum`, `any`,
//!   `all` and `find` mask the final partial word explicitly
//! - Appending at a non-word-aligned length shift-merges source words
//!   across the boundary after masking stale destination bits
//!
//! # Invariants
//!
//! - Backing word count is exactly `ceil(len / 32)` after every mutation
//! - Checked binary operations require identical lengths; a mismatch is a
//!   caller contract violation and panics

mod array;

pub use array::BitArray;
