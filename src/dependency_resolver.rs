use alloc::vec::Vec;
use tracing::{debug, error, info_span};

use crate::{
    any::TypeInfo,
    dependency::DependencyKind,
    errors::{InstantiateErrorKind, ResolveErrorKind},
    lifecycle::Lifecycle,
    params::Args,
    registry::Binding,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety},
    Container,
};

/// Contracts being built by one top-level resolution, outermost first
pub(crate) struct ResolutionPath {
    contracts: Vec<TypeInfo>,
    detect_cycles: bool,
}

impl ResolutionPath {
    #[inline]
    #[must_use]
    pub(crate) fn new(detect_cycles: bool) -> Self {
        Self {
            contracts: Vec::new(),
            detect_cycles,
        }
    }

    pub(crate) fn push(&mut self, contract: TypeInfo) -> Result<(), ResolveErrorKind> {
        if self.detect_cycles {
            if let Some(start) = self.contracts.iter().position(|visited| *visited == contract) {
                let mut path = Vec::with_capacity(self.contracts.len() - start + 1);
                path.extend_from_slice(&self.contracts[start..]);
                path.push(contract);

                return Err(ResolveErrorKind::CyclicConfiguration { path: path.into() });
            }
        }

        self.contracts.push(contract);
        Ok(())
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.contracts.pop();
    }

    #[inline]
    #[must_use]
    pub(crate) fn depth(&self) -> usize {
        self.contracts.len()
    }
}

impl Container {
    pub(crate) fn resolve_in(&self, contract: TypeInfo, path: &mut ResolutionPath) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let span = info_span!("resolve", contract = contract.name, depth = path.depth());
        let _guard = span.enter();

        let binding = self.inner.registry.read().get(&contract);
        let Some(binding) = binding else {
            let err = ResolveErrorKind::UnregisteredContract { contract };
            error!("{}", err);
            return Err(err);
        };

        if let Err(err) = path.push(contract) {
            error!("{}", err);
            return Err(err);
        }

        let result = match binding.lifecycle {
            Lifecycle::Singleton => self.get_or_build_singleton(&binding, path),
            Lifecycle::Scoped => self.get_or_build_scoped(&binding, path),
            Lifecycle::PerRequest => self.create_instance(&binding, path),
        };

        path.pop();
        result
    }

    fn get_or_build_singleton(&self, binding: &Binding, path: &mut ResolutionPath) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let cached = self.inner.singletons.lock().get(&binding.contract);
        if let Some(instance) = cached {
            debug!("Found in singleton store");
            return Ok(instance);
        }
        debug!("Not found in singleton store");

        let _build_guard = binding.build_lock.lock();

        // Another thread could build it while we were waiting for the lock
        let cached = self.inner.singletons.lock().get(&binding.contract);
        if let Some(instance) = cached {
            debug!("Found in singleton store after waiting");
            return Ok(instance);
        }

        let built = self.create_instance(binding, path)?;
        // A binding that replaced this one may have stored its instance meanwhile, the stored one is kept
        let instance = self.inner.singletons.lock().get_or_insert(binding.contract, built.clone());
        if RcThreadSafety::ptr_eq(&instance, &built) {
            debug!("Cached in singleton store");
        } else {
            debug!("Singleton store already filled, built instance dropped");
        }

        Ok(instance)
    }

    fn get_or_build_scoped(&self, binding: &Binding, path: &mut ResolutionPath) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let generation = self.scoped_lookup(binding)?;
        let generation = match generation {
            Ok(instance) => {
                debug!("Found in scoped store");
                return Ok(instance);
            }
            Err(generation) => generation,
        };
        debug!("Not found in scoped store");

        let _build_guard = binding.build_lock.lock();

        match self.scoped_lookup(binding)? {
            Ok(instance) => {
                debug!("Found in scoped store after waiting");
                return Ok(instance);
            }
            Err(current) if current != generation => return Err(self.scope_inactive(binding)),
            Err(_) => {}
        }

        let built = self.create_instance(binding, path)?;

        let mut scope = self.inner.scope.lock();
        if !scope.is_current(generation) {
            drop(scope);
            debug!("Scope was left while building");
            return Err(self.scope_inactive(binding));
        }
        let instance = scope.cache.get_or_insert(binding.contract, built);
        drop(scope);
        debug!("Cached in scoped store");

        Ok(instance)
    }

    /// Returns the cached scoped instance, or the generation of the active scope if there is none
    fn scoped_lookup(&self, binding: &Binding) -> Result<Result<RcAnyThreadSafety, u64>, ResolveErrorKind> {
        let scope = self.inner.scope.lock();
        if !scope.active {
            drop(scope);
            return Err(self.scope_inactive(binding));
        }

        Ok(scope.cache.get(&binding.contract).ok_or(scope.generation))
    }

    fn scope_inactive(&self, binding: &Binding) -> ResolveErrorKind {
        let err = ResolveErrorKind::ScopeInactive {
            contract: binding.contract,
        };
        error!("{}", err);
        err
    }

    fn create_instance(&self, binding: &Binding, path: &mut ResolutionPath) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        if let Some(factory) = &binding.factory {
            return factory().map_err(|source| {
                let err = ResolveErrorKind::Instantiate {
                    contract: binding.contract,
                    source,
                };
                error!("{}", err);
                err
            });
        }

        let Some(implementation) = binding.implementation else {
            let err = ResolveErrorKind::NoConstructionStrategy {
                contract: binding.contract,
            };
            error!("{}", err);
            return Err(err);
        };

        let mut args = Args::new();
        for dependency in (implementation.dependencies)() {
            if let Some(value) = binding.params.get(dependency.name) {
                debug!(param = dependency.name, "Explicit param used");
                args.insert(dependency.name, value.clone());
                continue;
            }

            let registered =
                dependency.kind == DependencyKind::Contract && self.inner.registry.read().contains_type(&dependency.type_info);
            if !registered {
                let err = ResolveErrorKind::UnresolvableDependency {
                    param: dependency.name,
                    implementation: implementation.type_info,
                };
                error!("{}", err);
                return Err(err);
            }

            let value = self.resolve_in(dependency.type_info, path)?;
            args.insert(dependency.name, value);
        }

        (implementation.construct)(args).map_err(|err| {
            let err = match err {
                InstantiateErrorKind::MissingArgument { param } => ResolveErrorKind::UnresolvableDependency {
                    param,
                    implementation: implementation.type_info,
                },
                InstantiateErrorKind::IncorrectType { param, expected } => ResolveErrorKind::IncorrectType { name: param, expected },
                source @ InstantiateErrorKind::Custom(_) => ResolveErrorKind::Instantiate {
                    contract: binding.contract,
                    source,
                },
            };
            error!("{}", err);
            err
        })
    }
}
