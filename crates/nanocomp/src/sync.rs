//! # Shared Registry Handle
//!
//! A [`Registry`] has no internal locking and is meant to be driven by one
//! thread at a time. When an embedder has to hand one registry to several
//! threads, it serializes access through this handle:
//!
//! ```text
//! Thread A ─┐
//!           ├─► SharedRegistry ─► Mutex<Registry<S>>
//! Thread B ─┘
//! ```
//!
//! Each lock is held for a whole unit of work (a system run, a clean-up),
//! never per entity.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::ecs::{ComponentSet, Registry};

/// Cloneable, thread-safe handle to a single registry.
///
/// ```rust,ignore
/// let shared = SharedRegistry::new(Registry::<GameComponents>::new());
/// let worker = shared.clone();
///
/// std::thread::spawn(move || {
///     worker.with(|registry| registry.new_entity().id())
/// });
/// ```
pub struct SharedRegistry<S: ComponentSet> {
    inner: Arc<Mutex<Registry<S>>>,
}

impl<S: ComponentSet> SharedRegistry<S> {
    /// Wraps a registry for shared access.
    #[must_use]
    pub fn new(registry: Registry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Locks the registry, blocking until it is available.
    pub fn lock(&self) -> MutexGuard<'_, Registry<S>> {
        self.inner.lock()
    }

    /// Locks the registry if no other handle holds it.
    #[must_use]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Registry<S>>> {
        self.inner.try_lock()
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut Registry<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Returns the registry if this is the last handle.
    ///
    /// # Errors
    ///
    /// Gives the handle back if other clones are still alive.
    pub fn into_inner(self) -> Result<Registry<S>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<S: ComponentSet> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ComponentSet> From<Registry<S>> for SharedRegistry<S> {
    fn from(registry: Registry<S>) -> Self {
        Self::new(registry)
    }
}
