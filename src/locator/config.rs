//! Engine construction options.

use serde::{Deserialize, Serialize};

/// Options applied when constructing a [`Locator`](super::Locator).
///
/// The defaults allocate nothing up front and seed the fresh-id source
/// from entropy. Tests and hosts that need reproducible collapsed-label
/// ids set `rng_seed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Preallocated capacity for the label list.
    #[serde(default)]
    pub label_capacity_hint: u32,
    /// Fixed seed for the fresh-id source; `None` seeds from entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl LocatorConfig {
    /// Config with a label-list capacity hint and entropy seeding.
    pub fn with_label_hint(hint: u32) -> Self {
        Self {
            label_capacity_hint: hint,
            rng_seed: None,
        }
    }

    /// Config with a fixed id-source seed and no capacity hint.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            label_capacity_hint: 0,
            rng_seed: Some(seed),
        }
    }
}
