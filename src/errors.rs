mod container;
mod dependency_resolver;
mod instantiate;

pub use container::ScopeErrorKind;
pub use dependency_resolver::ResolveErrorKind;
pub use instantiate::InstantiateErrorKind;

#[allow(type_alias_bounds)]
pub type InstantiatorResult<T, Err: Into<InstantiateErrorKind> = InstantiateErrorKind> = Result<T, Err>;
