use crate::{
    registry::{Registration, Registry},
    utils::thread_safety::{SendSafety, SyncSafety},
};

/// Combines configuration pieces, entries of `other` win over existing ones
pub trait Merge<T> {
    type Output;

    #[must_use]
    fn merge(self, other: T) -> Self::Output;
}

impl Merge<Registry> for Registry {
    type Output = Registry;

    #[inline]
    fn merge(mut self, other: Registry) -> Self::Output {
        self.bindings.extend(other.bindings);
        self
    }
}

impl<C> Merge<Registration<C>> for Registry
where
    C: ?Sized + SendSafety + SyncSafety + 'static,
{
    type Output = Registry;

    #[inline]
    fn merge(self, other: Registration<C>) -> Self::Output {
        self.add(other)
    }
}
