use alloc::vec::Vec;
use tracing::debug;

use crate::{
    any::TypeInfo,
    component::{Component, Upcast},
    dependency::Dependency,
    errors::InstantiatorResult,
    params::Args,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Type-erased constructor of an implementation bound to a contract
#[derive(Clone, Copy)]
pub(crate) struct Implementation {
    pub(crate) type_info: TypeInfo,
    pub(crate) dependencies: fn() -> Vec<Dependency>,
    pub(crate) construct: fn(Args) -> InstantiatorResult<RcAnyThreadSafety>,
}

impl Implementation {
    #[inline]
    #[must_use]
    pub(crate) fn of<C, I>() -> Self
    where
        C: ?Sized + SendSafety + SyncSafety + 'static,
        I: Component + Upcast<C>,
    {
        Self {
            type_info: TypeInfo::of::<I>(),
            dependencies: I::dependencies,
            construct: construct_erased::<C, I>,
        }
    }
}

fn construct_erased<C, I>(args: Args) -> InstantiatorResult<RcAnyThreadSafety>
where
    C: ?Sized + SendSafety + SyncSafety + 'static,
    I: Component + Upcast<C>,
{
    let instance = <I as Upcast<C>>::upcast(RcThreadSafety::new(I::construct(args)?));

    debug!("Constructed");

    Ok(RcThreadSafety::new(instance) as RcAnyThreadSafety)
}

#[cfg(feature = "thread_safe")]
pub(crate) type BoxedFactory = RcThreadSafety<dyn Fn() -> InstantiatorResult<RcAnyThreadSafety> + Send + Sync>;
#[cfg(not(feature = "thread_safe"))]
pub(crate) type BoxedFactory = RcThreadSafety<dyn Fn() -> InstantiatorResult<RcAnyThreadSafety>>;

#[must_use]
pub(crate) fn boxed_factory<C, F>(factory: F) -> BoxedFactory
where
    C: ?Sized + SendSafety + SyncSafety + 'static,
    F: Fn() -> InstantiatorResult<RcThreadSafety<C>> + SendSafety + SyncSafety + 'static,
{
    RcThreadSafety::new(move || -> InstantiatorResult<RcAnyThreadSafety> {
        let instance = factory()?;

        debug!("Produced by factory");

        Ok(RcThreadSafety::new(instance) as RcAnyThreadSafety)
    })
}

/// Wrapper to create a factory that just returns passed instance.
/// It can be used when the instance was created outside the container.
#[inline]
#[must_use]
pub fn instance<C>(instance: RcThreadSafety<C>) -> impl Fn() -> InstantiatorResult<RcThreadSafety<C>> + SendSafety + SyncSafety + 'static
where
    C: ?Sized + SendSafety + SyncSafety + 'static,
{
    move || -> InstantiatorResult<RcThreadSafety<C>> { Ok(instance.clone()) }
}
