//! [`RunnerRegistry`]: tracks the animated surfaces which are currently live.
//!
//! A host typically keeps one registry, keyed by whatever identifies an open menu (a
//! player, a window id), and passes it to the code which opens menus. Opening a menu
//! registers its runner; the returned [`Registration`] is kept alongside the menu and
//! dropped when the menu closes, which stops the runner and removes the entry.

#![allow(
    clippy::module_name_repetitions,
    reason = "these names are re-exported and used unqualified"
)]

use core::fmt;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::debug;

use crate::runner::RunnerHandle;

// -------------------------------------------------------------------------------------------------

/// Something a [`RunnerRegistry`] can stop.
pub trait Stop: Send + 'static {
    /// Stops whatever this is. Must tolerate being called more than once.
    fn stop(&self);
}

impl Stop for RunnerHandle {
    fn stop(&self) {
        RunnerHandle::stop(self)
    }
}

impl<F: Fn() + Send + 'static> Stop for F {
    fn stop(&self) {
        self()
    }
}

// -------------------------------------------------------------------------------------------------

/// Registry of live animated surfaces, keyed by `K`.
///
/// Clones refer to the same registry.
pub struct RunnerRegistry<K> {
    shared: Arc<Mutex<Entries<K>>>,
}

struct Entries<K> {
    next_id: u64,
    map: BTreeMap<K, (u64, Box<dyn Stop>)>,
}

impl<K: Ord + Clone + Send + 'static> RunnerRegistry<K> {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Entries {
                next_id: 0,
                map: BTreeMap::new(),
            })),
        }
    }

    /// Registers `surface` under `key`, stopping any surface previously registered under
    /// the same key.
    ///
    /// The surface stays registered until the returned [`Registration`] is dropped or
    /// disposed, or until it is replaced or stopped through the registry.
    #[must_use = "dropping the Registration immediately stops the surface"]
    pub fn register(&self, key: K, surface: impl Stop) -> Registration {
        let surface: Box<dyn Stop> = Box::new(surface);
        let (id, replaced) = {
            let mut entries = self.lock();
            let id = entries.next_id;
            entries.next_id += 1;
            (id, entries.map.insert(key.clone(), (id, surface)))
        };
        // Stopped outside the lock in case the surface calls back into the registry.
        if let Some((_, previous)) = replaced {
            debug!("registry: replacing a live surface");
            previous.stop();
        }

        let weak = Arc::downgrade(&self.shared);
        Registration {
            dispose: Some(Box::new(move || unregister(&weak, &key, id))),
        }
    }

    /// Stops and unregisters every surface.
    pub fn stop_all(&self) {
        let map = core::mem::take(&mut self.lock().map);
        debug!("registry: stopping {} surfaces", map.len());
        for (_, surface) in map.into_values() {
            surface.stop();
        }
    }

    /// Returns whether a surface is registered under `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.lock().map.contains_key(key)
    }

    /// Returns the number of registered surfaces.
    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Entries<K>> {
        lock(&self.shared)
    }
}

fn lock<K>(shared: &Mutex<Entries<K>>) -> MutexGuard<'_, Entries<K>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes and stops the entry for `key` if it is still the one with `id`.
fn unregister<K: Ord>(weak: &Weak<Mutex<Entries<K>>>, key: &K, id: u64) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let removed = {
        let mut entries = lock(&shared);
        match entries.map.get(key) {
            Some(&(current, _)) if current == id => entries.map.remove(key),
            _ => None,
        }
    };
    if let Some((_, surface)) = removed {
        surface.stop();
    }
}

impl<K: Ord + Clone + Send + 'static> Default for RunnerRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for RunnerRegistry<K> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RunnerRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = lock(&self.shared);
        f.debug_set().entries(entries.map.keys()).finish()
    }
}

// -------------------------------------------------------------------------------------------------

/// Keeps a surface registered in a [`RunnerRegistry`]. Obtained from
/// [`RunnerRegistry::register()`].
///
/// Dropping this or calling [`dispose()`](Self::dispose) stops the surface and removes
/// it from the registry, unless it has already been replaced or stopped through the
/// registry.
pub struct Registration {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Registration {
    /// Stops and unregisters the surface now. Equivalent to dropping `self`.
    pub fn dispose(mut self) {
        self.dispose_now();
    }

    fn dispose_now(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.dispose_now();
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("live", &self.dispose.is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
