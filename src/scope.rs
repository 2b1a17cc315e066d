use core::{mem, ops::Deref};
use tracing::debug;

use crate::{cache::Cache, errors::ScopeErrorKind, Container};

/// State of the single scope a container can have.
///
/// `generation` is bumped on every entry, so an instance built for a scope
/// that was left in the meantime is never stored in the next one.
pub(crate) struct ScopeState {
    pub(crate) active: bool,
    pub(crate) generation: u64,
    pub(crate) cache: Cache,
}

impl ScopeState {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            generation: 0,
            cache: Cache::new(),
        }
    }

    /// Marks the scope active with an empty store.
    /// Returns the store of the previous scope to be dropped outside of the lock.
    pub(crate) fn enter(&mut self) -> Result<Cache, ScopeErrorKind> {
        if self.active {
            return Err(ScopeErrorKind::AlreadyActive);
        }

        self.active = true;
        self.generation = self.generation.wrapping_add(1);
        Ok(mem::take(&mut self.cache))
    }

    /// Marks the scope inactive.
    /// Returns the store of the left scope to be dropped outside of the lock.
    pub(crate) fn leave(&mut self) -> Cache {
        self.active = false;
        mem::take(&mut self.cache)
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.active && self.generation == generation
    }
}

/// Active scope of a container.
///
/// The scope is left when the guard is dropped, including unwinding after a panic.
/// Dereferences to the container, so scoped contracts can be resolved through the guard.
#[must_use = "the scope is left as soon as the guard is dropped"]
pub struct ScopeGuard {
    container: Container,
}

impl ScopeGuard {
    #[inline]
    pub(crate) fn new(container: Container) -> Self {
        Self { container }
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }
}

impl Deref for ScopeGuard {
    type Target = Container;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.container
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.container.leave_scope();
        debug!("Scope guard dropped");
    }
}
