//! Handle table mapping opaque ids to live engine instances.

use std::collections::HashMap;

use crate::locator::{Locator, LocatorConfig};
use crate::observability::{Logger, Severity};

use super::errors::{RegistryError, RegistryResult};

/// Owns every live [`Locator`] and the handles that address them.
///
/// The registry is a plain value: the host embeds one and serializes
/// access to it, the same way it serializes access to each instance.
#[derive(Debug)]
pub struct Registry {
    instances: HashMap<u32, Locator>,
    next_handle: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry. The first handle issued is 1, leaving 0
    /// free for hosts that treat it as "no instance".
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Creates an instance with default options.
    pub fn create_default(&mut self) -> u32 {
        self.create(LocatorConfig::default())
    }

    /// Creates an instance from `config` and returns its handle.
    pub fn create(&mut self, config: LocatorConfig) -> u32 {
        let hint = config.label_capacity_hint;
        let handle = self.issue_handle();
        self.instances.insert(handle, Locator::with_config(config));

        Logger::log(
            Severity::Info,
            "instance_created",
            &[
                ("handle", &handle.to_string()),
                ("label_capacity_hint", &hint.to_string()),
            ],
        );
        handle
    }

    /// Destroys the instance behind `handle`.
    pub fn destroy(&mut self, handle: u32) -> RegistryResult<()> {
        if self.instances.remove(&handle).is_none() {
            return Err(RegistryError::UnknownHandle(handle));
        }
        Logger::log(
            Severity::Info,
            "instance_destroyed",
            &[("handle", &handle.to_string())],
        );
        Ok(())
    }

    /// Destroys every instance; handles are still not reused afterwards.
    pub fn destroy_all(&mut self) {
        let count = self.instances.len();
        self.instances.clear();
        Logger::log(
            Severity::Info,
            "instances_destroyed",
            &[("count", &count.to_string())],
        );
    }

    /// Deep-copies the instance behind `handle` into a new instance.
    pub fn copy(&mut self, handle: u32) -> RegistryResult<u32> {
        let duplicate = match self.instances.get(&handle) {
            Some(instance) => instance.clone(),
            None => return Err(RegistryError::UnknownHandle(handle)),
        };

        let new_handle = self.issue_handle();
        self.instances.insert(new_handle, duplicate);

        Logger::log(
            Severity::Info,
            "instance_copied",
            &[
                ("source", &handle.to_string()),
                ("handle", &new_handle.to_string()),
            ],
        );
        Ok(new_handle)
    }

    /// `true` when `handle` names a live instance.
    pub fn exists(&self, handle: u32) -> bool {
        self.instances.contains_key(&handle)
    }

    /// Resolves `handle` for reading.
    pub fn get(&self, handle: u32) -> RegistryResult<&Locator> {
        self.instances
            .get(&handle)
            .ok_or(RegistryError::UnknownHandle(handle))
    }

    /// Resolves `handle` for mutation.
    pub fn get_mut(&mut self, handle: u32) -> RegistryResult<&mut Locator> {
        self.instances
            .get_mut(&handle)
            .ok_or(RegistryError::UnknownHandle(handle))
    }

    /// Live handles, ascending.
    pub fn handles(&self) -> Vec<u32> {
        let mut handles: Vec<u32> = self.instances.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// `true` when no instances are live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn issue_handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}
