use alloc::collections::BTreeMap;
use core::marker::PhantomData;
use parking_lot::ReentrantMutex;
use tracing::debug;

use crate::{
    any::TypeInfo,
    component::{Component, Upcast},
    errors::InstantiatorResult,
    instantiator::{boxed_factory, instance, BoxedFactory, Implementation},
    lifecycle::Lifecycle,
    params::Params,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Registered construction strategy and lifecycle of a contract.
///
/// If `factory` is set, it's used and `implementation` with `params` are ignored.
pub(crate) struct Binding {
    pub(crate) contract: TypeInfo,
    pub(crate) implementation: Option<Implementation>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) params: Params,
    pub(crate) factory: Option<BoxedFactory>,
    /// Serializes check-then-create of cached instances.
    /// Reentrant, so a cycle through the binding recurses instead of deadlocking when cycles aren't detected.
    pub(crate) build_lock: ReentrantMutex<()>,
}

/// Registration of contract `C`, built step by step and added with [`Registry::register`]
/// or [`crate::Container::register`].
///
/// # Examples
/// ```rust
/// use wirebox::{implements, Args, Component, Dependency, InstantiatorResult, Lifecycle, Params, Registration};
///
/// trait Repo: Send + Sync {}
///
/// struct MemoryRepo(usize);
///
/// impl Repo for MemoryRepo {}
///
/// impl Component for MemoryRepo {
///     fn dependencies() -> Vec<Dependency> {
///         vec![Dependency::value::<usize>("capacity")]
///     }
///
///     fn construct(args: Args) -> InstantiatorResult<Self> {
///         Ok(Self(args.value("capacity")?))
///     }
/// }
///
/// implements!(MemoryRepo: dyn Repo);
///
/// let registration = Registration::<dyn Repo>::new()
///     .implementation::<MemoryRepo>()
///     .lifecycle(Lifecycle::Singleton)
///     .params(Params::new().with("capacity", 16_usize));
/// ```
#[must_use]
pub struct Registration<C: ?Sized> {
    implementation: Option<Implementation>,
    lifecycle: Lifecycle,
    params: Params,
    factory: Option<BoxedFactory>,
    _contract: PhantomData<fn() -> RcThreadSafety<C>>,
}

impl<C> Default for Registration<C>
where
    C: ?Sized + SendSafety + SyncSafety + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Registration<C>
where
    C: ?Sized + SendSafety + SyncSafety + 'static,
{
    /// Creates registration without construction strategy and with [`Lifecycle::PerRequest`] lifecycle
    #[inline]
    pub fn new() -> Self {
        Self {
            implementation: None,
            lifecycle: Lifecycle::default(),
            params: Params::new(),
            factory: None,
            _contract: PhantomData,
        }
    }

    /// Constructs the contract with `I`, resolving its [`Component::dependencies`]
    #[inline]
    pub fn implementation<I>(mut self) -> Self
    where
        I: Component + Upcast<C>,
    {
        self.implementation = Some(Implementation::of::<C, I>());
        self
    }

    #[inline]
    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Explicit constructor arguments of the implementation, see [`Params`]
    #[inline]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Constructs the contract with `factory`.
    /// Takes precedence over [`Self::implementation`] and [`Self::params`].
    #[inline]
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> InstantiatorResult<RcThreadSafety<C>> + SendSafety + SyncSafety + 'static,
    {
        self.factory = Some(boxed_factory(factory));
        self
    }

    /// Provides an instance created outside the container
    #[inline]
    pub fn instance(self, value: RcThreadSafety<C>) -> Self {
        self.factory(instance(value))
    }

    #[inline]
    pub(crate) fn into_binding(self) -> Binding {
        Binding {
            contract: TypeInfo::of::<C>(),
            implementation: self.implementation,
            lifecycle: self.lifecycle,
            params: self.params,
            factory: self.factory,
            build_lock: ReentrantMutex::new(()),
        }
    }
}

/// Mapping of contracts to their bindings.
/// Registering a contract again replaces the previous binding.
#[derive(Default, Clone)]
pub struct Registry {
    pub(crate) bindings: BTreeMap<TypeInfo, RcThreadSafety<Binding>>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds contract `C` to implementation `I`
    #[inline]
    #[must_use]
    pub fn bind<C, I>(self, lifecycle: Lifecycle) -> Self
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
        I: Component + Upcast<C>,
    {
        self.add(Registration::<C>::new().implementation::<I>().lifecycle(lifecycle))
    }

    /// Binds contract `C` to implementation `I` with explicit constructor arguments
    #[inline]
    #[must_use]
    pub fn bind_with_params<C, I>(self, lifecycle: Lifecycle, params: Params) -> Self
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
        I: Component + Upcast<C>,
    {
        self.add(Registration::<C>::new().implementation::<I>().lifecycle(lifecycle).params(params))
    }

    /// Binds contract `C` to a factory
    #[inline]
    #[must_use]
    pub fn bind_factory<C, F>(self, lifecycle: Lifecycle, factory: F) -> Self
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
        F: Fn() -> InstantiatorResult<RcThreadSafety<C>> + SendSafety + SyncSafety + 'static,
    {
        self.add(Registration::<C>::new().factory(factory).lifecycle(lifecycle))
    }

    /// Binds contract `C` to an instance created outside the container
    #[inline]
    #[must_use]
    pub fn bind_instance<C>(self, instance: RcThreadSafety<C>) -> Self
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
    {
        self.add(Registration::<C>::new().instance(instance).lifecycle(Lifecycle::Singleton))
    }

    #[inline]
    #[must_use]
    pub fn add<C>(mut self, registration: Registration<C>) -> Self
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
    {
        self.register(registration);
        self
    }

    /// Adds the registration, returns `true` if a previous binding of the contract was replaced
    pub fn register<C>(&mut self, registration: Registration<C>) -> bool
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
    {
        let binding = registration.into_binding();
        let contract = binding.contract;
        let lifecycle = binding.lifecycle;

        let replaced = self.bindings.insert(contract, RcThreadSafety::new(binding)).is_some();
        if replaced {
            debug!(contract = contract.name, lifecycle = lifecycle.name(), "Binding replaced");
        } else {
            debug!(contract = contract.name, lifecycle = lifecycle.name(), "Binding added");
        }
        replaced
    }

    #[inline]
    #[must_use]
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.contains_type(&TypeInfo::of::<C>())
    }

    #[inline]
    #[must_use]
    pub fn lifecycle_of<C: ?Sized + 'static>(&self) -> Option<Lifecycle> {
        self.bindings.get(&TypeInfo::of::<C>()).map(|binding| binding.lifecycle)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains_type(&self, contract: &TypeInfo) -> bool {
        self.bindings.contains_key(contract)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, contract: &TypeInfo) -> Option<RcThreadSafety<Binding>> {
        self.bindings.get(contract).cloned()
    }
}
