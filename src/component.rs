use alloc::vec::Vec;

use crate::{dependency::Dependency, errors::InstantiatorResult, params::Args, utils::thread_safety::RcThreadSafety};

/// Implementation that the container can construct.
///
/// [`Component::dependencies`] declares the constructor parameters in order,
/// the container assembles them and passes them to [`Component::construct`].
///
/// # Examples
/// ```rust
/// use wirebox::{Args, Component, Dependency, InstantiatorResult, RcThreadSafety};
///
/// trait Logger: Send + Sync {}
///
/// struct Service {
///     logger: RcThreadSafety<dyn Logger>,
///     retries: u8,
/// }
///
/// impl Component for Service {
///     fn dependencies() -> Vec<Dependency> {
///         vec![Dependency::contract::<dyn Logger>("logger"), Dependency::value::<u8>("retries")]
///     }
///
///     fn construct(args: Args) -> InstantiatorResult<Self> {
///         Ok(Self {
///             logger: args.get("logger")?,
///             retries: args.value("retries")?,
///         })
///     }
/// }
/// ```
pub trait Component: Sized + 'static {
    #[must_use]
    fn dependencies() -> Vec<Dependency>;

    #[allow(clippy::missing_errors_doc)]
    fn construct(args: Args) -> InstantiatorResult<Self>;
}

/// Conversion of an implementation handle into a handle of contract `C`.
///
/// Every type is its own contract, other contracts are declared with [`crate::implements`].
pub trait Upcast<C: ?Sized> {
    fn upcast(this: RcThreadSafety<Self>) -> RcThreadSafety<C>;
}

impl<T: 'static> Upcast<T> for T {
    #[inline]
    fn upcast(this: RcThreadSafety<Self>) -> RcThreadSafety<T> {
        this
    }
}

/// Declares contracts that an implementation can be bound to.
///
/// # Syntax
/// ```text
/// implements!(Type: Contract [, Contract2 ...]);
/// ```
///
/// # Examples
/// ```rust
/// use wirebox::implements;
///
/// trait UserRepo: Send + Sync {}
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {}
///
/// implements!(PostgresUserRepo: dyn UserRepo);
/// ```
#[macro_export]
macro_rules! implements {
    ($ty:ty : $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Upcast<$contract> for $ty {
                #[inline]
                fn upcast(this: $crate::RcThreadSafety<Self>) -> $crate::RcThreadSafety<$contract> {
                    this
                }
            }
        )+
    };
}
