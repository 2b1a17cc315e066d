#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod component;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod dependency;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod lifecycle;
pub(crate) mod params;
pub(crate) mod registry;
pub(crate) mod scope;

pub mod utils;

pub use any::TypeInfo;
pub use component::{Component, Upcast};
pub use config::Config;
pub use container::Container;
pub use dependency::{Dependency, DependencyKind};
pub use errors::{InstantiateErrorKind, InstantiatorResult, ResolveErrorKind, ScopeErrorKind};
pub use instantiator::instance;
pub use lifecycle::Lifecycle;
pub use params::{Args, Params};
pub use registry::{Registration, Registry};
pub use scope::ScopeGuard;
pub use utils::{merge::Merge, thread_safety::RcThreadSafety};
