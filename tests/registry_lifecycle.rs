//! Registry Lifecycle Tests
//!
//! Tests for the opaque-handle boundary:
//! - Handles resolve only while their instance is live
//! - Copies are deep and fully independent of their source
//! - Handles are never reused within one registry

use taxodb::bits::BitArray;
use taxodb::locator::LocatorConfig;
use taxodb::registry::{Registry, RegistryError};

// =============================================================================
// Helper Functions
// =============================================================================

fn filled_indicator(size: u32, rows: &[u32]) -> BitArray {
    let mut indicator = BitArray::with_len(size);
    for &row in rows {
        indicator.place(true, row);
    }
    indicator
}

// =============================================================================
// Handle lifecycle
// =============================================================================

/// A created handle exists until destroyed, then resolves to an error.
#[test]
fn test_create_destroy_cycle() {
    let mut registry = Registry::new();
    let handle = registry.create_default();

    assert!(registry.exists(handle));
    assert!(registry.get(handle).is_ok());

    registry.destroy(handle).unwrap();

    assert!(!registry.exists(handle));
    assert_eq!(registry.get(handle), Err(RegistryError::UnknownHandle(handle)));
    assert_eq!(
        registry.destroy(handle),
        Err(RegistryError::UnknownHandle(handle))
    );
}

/// destroy_all clears every instance at once.
#[test]
fn test_destroy_all() {
    let mut registry = Registry::new();
    let a = registry.create_default();
    let b = registry.create_default();

    registry.destroy_all();

    assert!(!registry.exists(a));
    assert!(!registry.exists(b));
    assert!(registry.is_empty());
}

/// Destroyed handles are never handed out again.
#[test]
fn test_handles_never_reused() {
    let mut registry = Registry::new();
    let mut issued = Vec::new();

    for _ in 0..5 {
        let handle = registry.create_default();
        assert!(
            !issued.contains(&handle),
            "handle {} issued twice",
            handle
        );
        issued.push(handle);
        registry.destroy(handle).unwrap();
    }
}

/// Config passes through create to the instance.
#[test]
fn test_create_with_config() {
    let mut registry = Registry::new();
    let handle = registry.create(LocatorConfig::with_seed(9));

    let instance = registry.get_mut(handle).unwrap();
    instance.require_category(0);
    instance
        .set_category(0, 1, &filled_indicator(4, &[0, 1]))
        .unwrap();
    instance
        .set_category(0, 2, &filled_indicator(4, &[2, 3]))
        .unwrap();

    // seeded id source makes the collapse deterministic
    instance.collapse_category(0).unwrap();
    assert_eq!(instance.n_labels(), 1);
}

// =============================================================================
// Copy semantics
// =============================================================================

/// A copied instance shares no state with its source.
#[test]
fn test_copy_is_independent() {
    let mut registry = Registry::new();
    let source = registry.create_default();

    {
        let instance = registry.get_mut(source).unwrap();
        instance.require_category(0);
        instance
            .set_category(0, 1, &filled_indicator(3, &[0, 1, 2]))
            .unwrap();
    }

    let duplicate = registry.copy(source).unwrap();
    assert_ne!(source, duplicate);

    // the two engines start out equal
    {
        let original = registry.get(source).unwrap();
        let copied = registry.get(duplicate).unwrap();
        assert!(original == copied);
    }

    // mutating the copy leaves the source untouched
    registry
        .get_mut(duplicate)
        .unwrap()
        .set_category(0, 2, &filled_indicator(3, &[1]))
        .unwrap();

    assert_eq!(registry.get(source).unwrap().n_labels(), 1);
    assert_eq!(registry.get(duplicate).unwrap().n_labels(), 2);
}

/// Copying an unknown handle reports it.
#[test]
fn test_copy_unknown_handle() {
    let mut registry = Registry::new();
    assert_eq!(registry.copy(3), Err(RegistryError::UnknownHandle(3)));
}
