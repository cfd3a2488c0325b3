//! Growable typed buffers for taxodb
//!
//! The buffer layer is the leaf of the engine: everything above it (packed
//! bitsets, label and category lists, query results) stores its elements in
//! a [`DynamicArray`].
//!
//! # Design Principles
//!
//! - Allocated capacity and logical length ("tail") are decoupled
//! - Growth doubles capacity, minimum capacity 1
//! - Deep copy; moving transfers ownership and empties the source
//! - Deterministic: no iteration-order or allocation-order dependence
//!
//! # Invariants
//!
//! - `tail <= capacity` at all times
//! - Every slot in `[0, capacity)` is initialized and addressable by `place`
//! - Sorted prefixes are maintained by callers; `search` requires one

mod dynamic;

pub use dynamic::DynamicArray;
