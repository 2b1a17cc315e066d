use crate::any::TypeInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Resolved from the container when no explicit param overrides it
    Contract,
    /// Plain value, only an explicit param can provide it
    Value,
}

/// Constructor parameter of an implementation, see [`crate::Component::dependencies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub name: &'static str,
    pub type_info: TypeInfo,
    pub kind: DependencyKind,
}

impl Dependency {
    #[inline]
    #[must_use]
    pub fn contract<C: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            type_info: TypeInfo::of::<C>(),
            kind: DependencyKind::Contract,
        }
    }

    #[inline]
    #[must_use]
    pub fn value<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            type_info: TypeInfo::of::<T>(),
            kind: DependencyKind::Value,
        }
    }
}
