//! Categorical index engine for taxodb
//!
//! A [`Locator`] maintains named categories over a shared row domain.
//! Each category owns a sorted list of label ids; each label owns one
//! packed indicator marking the rows it covers. Writes enforce mutual
//! exclusion inside a category with AND-NOT; queries compose indicators
//! with OR (within a category) and AND (across categories).
//!
//! # Invariants
//!
//! - Every label belongs to exactly one category
//! - Indicators of labels sharing a category are pairwise disjoint
//! - A label whose indicator goes all-false is pruned automatically
//! - All indicators share one length; an engine with no labels has size 0
//! - Label and category id lists stay sorted (binary-search precondition)

mod config;
mod engine;
mod errors;
mod groups;
mod ids;

pub use config::LocatorConfig;
pub use engine::{Locator, UNDEFINED_LABEL};
pub use errors::{LocatorError, LocatorResult};
pub use groups::FindAll;
pub use ids::IdSource;
