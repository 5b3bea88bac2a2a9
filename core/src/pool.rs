//! Interning pool for renderable configurations.
//!
//! This module provides [`ConfigurationPool`], which assigns a small stable
//! [`ConfigHandle`] to every structurally distinct
//! [`RenderableConfiguration`]. Meshes store the handle instead of their own
//! copy of the layout, so a renderer can select a GPU vertex layout per handle
//! and reuse it across every mesh that shares it.
//!
//! The pool is an explicit service, never a global. Builders receive a
//! [`SharedConfigurationPool`] at construction; tests create isolated pools.
//!
//! # Example
//!
//! ```
//! use tessellator_core::mesh::RenderableConfiguration;
//! use tessellator_core::pool::ConfigurationPool;
//!
//! let mut pool = ConfigurationPool::new();
//! let mut working = RenderableConfiguration::new();
//!
//! let first = pool.intern(&working);
//! // The pool keeps its own clone, the working copy stays mutable.
//! working = working.with_tex_coord_components(3).unwrap();
//! let second = pool.intern(&working);
//!
//! assert_ne!(first, second);
//! assert_eq!(pool.intern(&RenderableConfiguration::new()), first);
//! assert_eq!(pool.len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::error::{MeshError, MeshResult};
use crate::mesh::RenderableConfiguration;

/// Stable handle to an interned configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigHandle(u32);

impl ConfigHandle {
    /// Raw handle value.
    pub fn id(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interns [`RenderableConfiguration`] values.
///
/// Handles are issued in insertion order. Equal configurations always map to
/// the same handle, and stored configurations are never mutated.
#[derive(Debug, Default)]
pub struct ConfigurationPool {
    configs: Vec<RenderableConfiguration>,
    lookup: HashMap<RenderableConfiguration, ConfigHandle>,
}

impl ConfigurationPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle of an equal configuration, or store a clone of
    /// `config` and issue a new handle.
    pub fn intern(&mut self, config: &RenderableConfiguration) -> ConfigHandle {
        if let Some(&handle) = self.lookup.get(config) {
            return handle;
        }
        let handle = ConfigHandle(self.configs.len() as u32);
        self.configs.push(config.clone());
        self.lookup.insert(config.clone(), handle);
        log::debug!("Interned renderable configuration {:?} as {}", config, handle.0);
        handle
    }

    /// Look up the handle of an equal configuration without inserting.
    pub fn find(&self, config: &RenderableConfiguration) -> Option<ConfigHandle> {
        self.lookup.get(config).copied()
    }

    /// Resolve a handle.
    pub fn get(&self, handle: ConfigHandle) -> MeshResult<&RenderableConfiguration> {
        self.configs
            .get(handle.index())
            .ok_or(MeshError::InvalidHandle(handle.0))
    }

    pub fn contains(&self, handle: ConfigHandle) -> bool {
        handle.index() < self.configs.len()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Iterate over `(handle, configuration)` in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigHandle, &RenderableConfiguration)> {
        self.configs
            .iter()
            .enumerate()
            .map(|(i, config)| (ConfigHandle(i as u32), config))
    }
}

/// A [`ConfigurationPool`] shared between builders and meshes.
///
/// Cloning is cheap and yields another reference to the same pool. Interning
/// takes an upgradable read lock and only upgrades to a write lock when the
/// configuration is new, so concurrent loaders never race on handle
/// assignment.
#[derive(Debug, Clone, Default)]
pub struct SharedConfigurationPool {
    inner: Arc<RwLock<ConfigurationPool>>,
}

impl SharedConfigurationPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, config: &RenderableConfiguration) -> ConfigHandle {
        let pool = self.inner.upgradable_read();
        if let Some(handle) = pool.find(config) {
            return handle;
        }
        let mut pool = RwLockUpgradableReadGuard::upgrade(pool);
        pool.intern(config)
    }

    /// Resolve a handle to a copy of its configuration.
    pub fn get(&self, handle: ConfigHandle) -> MeshResult<RenderableConfiguration> {
        self.inner.read().get(handle).cloned()
    }

    pub fn contains(&self, handle: ConfigHandle) -> bool {
        self.inner.read().contains(handle)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` with shared access to the underlying pool.
    pub fn with<R>(&self, f: impl FnOnce(&ConfigurationPool) -> R) -> R {
        f(&self.inner.read())
    }

    /// Whether both values refer to the same pool.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
