//! Opaque-handle instance registry for taxodb
//!
//! Host bindings address engine instances through opaque `u32` handles
//! rather than owning them directly. The registry owns the live
//! instances, hands out handles, and resolves them back for every call
//! crossing the boundary. Argument marshaling and any 1-based row-offset
//! translation stay on the host side.
//!
//! # Invariants
//!
//! - Handles are assigned sequentially and never reused by one registry
//! - Copies are deep: the new instance shares nothing with the source

mod errors;
mod handles;

pub use errors::{RegistryError, RegistryResult};
pub use handles::Registry;
