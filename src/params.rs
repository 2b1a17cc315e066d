use alloc::collections::BTreeMap;
use core::any::type_name;

use crate::{
    errors::{InstantiateErrorKind, InstantiatorResult},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Explicit constructor arguments of a registration, keyed by parameter name.
///
/// An explicit argument always wins over resolving the parameter from the container.
#[derive(Clone, Default)]
pub struct Params {
    values: BTreeMap<&'static str, RcAnyThreadSafety>,
}

impl Params {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain value, read by the constructor with [`Args::value`]
    #[inline]
    #[must_use]
    pub fn with<T: SendSafety + SyncSafety + 'static>(mut self, name: &'static str, value: T) -> Self {
        self.values.insert(name, RcThreadSafety::new(value));
        self
    }

    /// Adds a ready instance of contract `C`, read by the constructor with [`Args::get`]
    #[inline]
    #[must_use]
    pub fn with_instance<C>(mut self, name: &'static str, instance: RcThreadSafety<C>) -> Self
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
    {
        self.values.insert(name, RcThreadSafety::new(instance));
        self
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub(crate) fn get(&self, name: &str) -> Option<&RcAnyThreadSafety> {
        self.values.get(name)
    }
}

/// Arguments assembled for one constructor call.
pub struct Args {
    values: BTreeMap<&'static str, RcAnyThreadSafety>,
}

impl Args {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { values: BTreeMap::new() }
    }

    #[inline]
    pub(crate) fn insert(&mut self, name: &'static str, value: RcAnyThreadSafety) {
        self.values.insert(name, value);
    }

    /// Gets an instance of contract `C`, either resolved from the container or passed with [`Params::with_instance`]
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if no argument with the name was assembled
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the argument isn't an instance of `C`
    pub fn get<C>(&self, name: &'static str) -> InstantiatorResult<RcThreadSafety<C>>
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
    {
        self.lookup(name)?
            .downcast_ref::<RcThreadSafety<C>>()
            .cloned()
            .ok_or(InstantiateErrorKind::IncorrectType {
                param: name,
                expected: type_name::<C>(),
            })
    }

    /// Gets a clone of a plain value passed with [`Params::with`]
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if no argument with the name was assembled
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the argument isn't a `T`
    pub fn value<T: Clone + 'static>(&self, name: &'static str) -> InstantiatorResult<T> {
        self.lookup(name)?
            .downcast_ref::<T>()
            .cloned()
            .ok_or(InstantiateErrorKind::IncorrectType {
                param: name,
                expected: type_name::<T>(),
            })
    }

    fn lookup(&self, name: &'static str) -> InstantiatorResult<&RcAnyThreadSafety> {
        self.values.get(name).ok_or(InstantiateErrorKind::MissingArgument { param: name })
    }
}
