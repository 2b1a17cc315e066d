use core::any::type_name;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

use crate::{
    any::TypeInfo,
    cache::Cache,
    config::Config,
    dependency_resolver::ResolutionPath,
    errors::{ResolveErrorKind, ScopeErrorKind},
    lifecycle::Lifecycle,
    registry::{Registration, Registry},
    scope::{ScopeGuard, ScopeState},
    utils::{
        merge::Merge as _,
        thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    },
};

/// Dependency-injection container.
///
/// Holds the registry, the singleton store and the state of the single scope.
/// Cloning is cheap and clones share all of them.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: RcThreadSafety<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) registry: RwLock<Registry>,
    pub(crate) singletons: Mutex<Cache>,
    pub(crate) scope: Mutex<ScopeState>,
    pub(crate) config: Config,
}

impl Default for Container {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::new_with_config(registry, Config::default())
    }

    #[inline]
    #[must_use]
    pub fn new_with_config(registry: Registry, config: Config) -> Self {
        Self {
            inner: RcThreadSafety::new(ContainerInner {
                registry: RwLock::new(registry),
                singletons: Mutex::new(Cache::new()),
                scope: Mutex::new(ScopeState::new()),
                config,
            }),
        }
    }

    /// Registers contract `C`, replacing its previous binding.
    /// Returns `true` if a binding was replaced.
    ///
    /// # Warning
    /// A singleton of the contract that was already resolved stays cached and is returned by next resolutions.
    pub fn register<C>(&self, registration: Registration<C>) -> bool
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
    {
        self.inner.registry.write().register(registration)
    }

    /// Adds all bindings of `registry`, its bindings win over registered ones
    pub fn extend(&self, registry: Registry) {
        let mut guard = self.inner.registry.write();
        let current = core::mem::take(&mut *guard);
        *guard = current.merge(registry);
    }

    #[inline]
    #[must_use]
    pub fn is_registered<C: ?Sized + 'static>(&self) -> bool {
        self.inner.registry.read().contains::<C>()
    }

    #[inline]
    #[must_use]
    pub fn lifecycle_of<C: ?Sized + 'static>(&self) -> Option<Lifecycle> {
        self.inner.registry.read().lifecycle_of::<C>()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.config
    }

    /// Resolves an instance of contract `C` according to the lifecycle of its binding.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::UnregisteredContract`] if `C` has no binding
    /// - Returns [`ResolveErrorKind::ScopeInactive`] if a scoped contract is requested without active scope
    /// - Returns [`ResolveErrorKind::UnresolvableDependency`] if a constructor parameter has neither explicit param nor binding
    /// - Returns [`ResolveErrorKind::CyclicConfiguration`] if the contract depends on itself and cycles are detected
    /// - Returns [`ResolveErrorKind::Instantiate`] if a constructor or factory fails
    pub fn resolve<C>(&self) -> Result<RcThreadSafety<C>, ResolveErrorKind>
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
    {
        let contract = TypeInfo::of::<C>();

        let mut path = ResolutionPath::new(self.inner.config.detect_cycles);
        let instance = self.resolve_in(contract, &mut path)?;

        if let Some(instance) = instance.downcast_ref::<RcThreadSafety<C>>() {
            return Ok(instance.clone());
        }

        let err = ResolveErrorKind::IncorrectType {
            name: contract.name,
            expected: type_name::<RcThreadSafety<C>>(),
        };
        error!("{}", err);
        Err(err)
    }

    /// Runs `work` inside a scope.
    ///
    /// The scope is entered with an empty scoped store and left when `work` returns or panics,
    /// so scoped instances never outlive `work`. The result of `work` is returned as is.
    ///
    /// # Errors
    /// - Returns [`ScopeErrorKind::AlreadyActive`] if a scope is already active. Nested scopes aren't supported
    ///   and the active scope stays untouched.
    pub fn with_scope<F, R>(&self, work: F) -> Result<R, ScopeErrorKind>
    where
        F: FnOnce(&Container) -> R,
    {
        let guard = self.enter_scope()?;
        Ok(work(guard.container()))
    }

    /// Enters a scope that lasts until the returned guard is dropped.
    ///
    /// # Errors
    /// - Returns [`ScopeErrorKind::AlreadyActive`] if a scope is already active
    pub fn enter_scope(&self) -> Result<ScopeGuard, ScopeErrorKind> {
        let previous = {
            let mut scope = self.inner.scope.lock();
            match scope.enter() {
                Ok(previous) => {
                    debug!(generation = scope.generation, "Scope entered");
                    previous
                }
                Err(err) => {
                    error!("{}", err);
                    return Err(err);
                }
            }
        };
        drop(previous);

        Ok(ScopeGuard::new(self.clone()))
    }

    #[inline]
    #[must_use]
    pub fn is_scope_active(&self) -> bool {
        self.inner.scope.lock().active
    }

    pub(crate) fn leave_scope(&self) {
        let left = {
            let mut scope = self.inner.scope.lock();
            debug!(generation = scope.generation, "Scope left");
            scope.leave()
        };
        // Scoped instances are dropped outside of the lock
        drop(left);
    }
}
