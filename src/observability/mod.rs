//! Structured logging for taxodb
//!
//! Lifecycle events (registry creates, copies, destroys) are logged as
//! structured JSON lines. The engine's query and mutation paths never log.
//!
//! # Design Principles
//!
//! - One log line = one event
//! - Deterministic key ordering (event first, fields sorted)
//! - Synchronous, no buffering

mod logger;

pub use logger::{Logger, Severity};
