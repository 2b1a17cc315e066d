use alloc::{boxed::Box, string::String, vec::Vec};

use super::instantiate::InstantiateErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Contract {contract} not registered")]
    UnregisteredContract { contract: TypeInfo },
    #[error("Scoped contract {contract} requested outside of scope")]
    ScopeInactive { contract: TypeInfo },
    #[error("Cannot resolve dependency '{param}' of {implementation}")]
    UnresolvableDependency { param: &'static str, implementation: TypeInfo },
    #[error("Cyclic configuration detected: {}", display_path(path))]
    CyclicConfiguration { path: Box<[TypeInfo]> },
    #[error("Contract {contract} has neither an implementation nor a factory")]
    NoConstructionStrategy { contract: TypeInfo },
    #[error("Incorrect type of '{name}', expected: {expected}")]
    IncorrectType { name: &'static str, expected: &'static str },
    #[error("Instantiation of {contract} failed: {source}")]
    Instantiate {
        contract: TypeInfo,
        #[source]
        source: InstantiateErrorKind,
    },
}

fn display_path(path: &[TypeInfo]) -> String {
    path.iter().map(TypeInfo::short_name).collect::<Vec<_>>().join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::ResolveErrorKind;
    use crate::any::TypeInfo;

    use alloc::string::ToString as _;

    struct A;
    struct B;

    #[test]
    fn test_cyclic_configuration_display() {
        let err = ResolveErrorKind::CyclicConfiguration {
            path: [TypeInfo::of::<A>(), TypeInfo::of::<B>(), TypeInfo::of::<A>()].into(),
        };

        assert_eq!(err.to_string(), "Cyclic configuration detected: A -> B -> A");
    }

    #[test]
    fn test_unresolvable_dependency_display() {
        let err = ResolveErrorKind::UnresolvableDependency {
            param: "name",
            implementation: TypeInfo::of::<A>(),
        };

        assert!(err.to_string().starts_with("Cannot resolve dependency 'name' of "));
    }
}
