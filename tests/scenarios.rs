use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
};

use anyhow::anyhow;
use tracing_test::traced_test;
use wirebox::{
    implements, Args, Component, Config, Container, Dependency, InstantiatorResult, Lifecycle, Params, Registration, Registry,
    ResolveErrorKind, TypeInfo,
};

trait Interface1: Send + Sync {
    fn describe(&self) -> String;
}

trait Interface3: Send + Sync {
    fn dep(&self) -> Arc<dyn Interface1>;
}

struct Class1;

impl Interface1 for Class1 {
    fn describe(&self) -> String {
        "class1".to_owned()
    }
}

impl Component for Class1 {
    fn dependencies() -> Vec<Dependency> {
        Vec::new()
    }

    fn construct(_args: Args) -> InstantiatorResult<Self> {
        Ok(Self)
    }
}

struct Class3 {
    dep: Arc<dyn Interface1>,
}

impl Interface3 for Class3 {
    fn dep(&self) -> Arc<dyn Interface1> {
        self.dep.clone()
    }
}

impl Component for Class3 {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::contract::<dyn Interface1>("dep")]
    }

    fn construct(args: Args) -> InstantiatorResult<Self> {
        Ok(Self { dep: args.get("dep")? })
    }
}

implements!(Class1: dyn Interface1);
implements!(Class3: dyn Interface3);

#[test]
#[traced_test]
fn scoped_consumer_of_singleton() {
    let container = Container::new(
        Registry::new()
            .bind::<dyn Interface1, Class1>(Lifecycle::Singleton)
            .bind::<dyn Interface3, Class3>(Lifecycle::Scoped),
    );

    let first = container
        .with_scope(|scope| {
            let first = scope.resolve::<dyn Interface3>().unwrap();
            let second = scope.resolve::<dyn Interface3>().unwrap();
            assert!(Arc::ptr_eq(&first, &second));
            first
        })
        .unwrap();

    let singleton = container.resolve::<dyn Interface1>().unwrap();
    assert!(Arc::ptr_eq(&first.dep(), &singleton));

    let third = container.with_scope(|scope| scope.resolve::<dyn Interface3>().unwrap()).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert!(Arc::ptr_eq(&third.dep(), &singleton));
}

#[test]
#[traced_test]
fn dependency_registered_after_consumer() {
    let container = Container::new(
        Registry::new()
            .bind::<dyn Interface3, Class3>(Lifecycle::PerRequest)
            .bind::<dyn Interface1, Class1>(Lifecycle::PerRequest),
    );

    let first = container.resolve::<dyn Interface3>().unwrap();
    let second = container.resolve::<dyn Interface3>().unwrap();

    assert_eq!(first.dep().describe(), "class1");
    assert!(!Arc::ptr_eq(&first.dep(), &second.dep()));
}

#[test]
#[traced_test]
fn explicit_param_overrides_contract() {
    let provided: Arc<dyn Interface1> = Arc::new(Class1);
    let container = Container::new(
        Registry::new()
            .bind::<dyn Interface1, Class1>(Lifecycle::Singleton)
            .bind_with_params::<dyn Interface3, Class3>(Lifecycle::PerRequest, Params::new().with_instance("dep", provided.clone())),
    );

    let resolved = container.resolve::<dyn Interface3>().unwrap();

    assert!(Arc::ptr_eq(&resolved.dep(), &provided));
    assert!(!Arc::ptr_eq(&resolved.dep(), &container.resolve::<dyn Interface1>().unwrap()));
}

#[test]
#[traced_test]
fn explicit_param_with_wrong_type() {
    let container = Container::new(
        Registry::new().bind_with_params::<dyn Interface3, Class3>(Lifecycle::PerRequest, Params::new().with("dep", 1_u8)),
    );

    assert!(matches!(
        container.resolve::<dyn Interface3>(),
        Err(ResolveErrorKind::IncorrectType { name: "dep", .. })
    ));
}

trait FixedValue: Send + Sync {
    fn value(&self) -> u32;
}

struct Fixed(u32);

impl FixedValue for Fixed {
    fn value(&self) -> u32 {
        self.0
    }
}

#[test]
#[traced_test]
fn factory_per_request() {
    let container = Container::new(
        Registry::new().bind_factory::<dyn FixedValue, _>(Lifecycle::PerRequest, || Ok(Arc::new(Fixed(42)) as Arc<dyn FixedValue>)),
    );

    let first = container.resolve::<dyn FixedValue>().unwrap();
    let second = container.resolve::<dyn FixedValue>().unwrap();

    assert_eq!(first.value(), 42);
    assert_eq!(second.value(), 42);
    assert!(!Arc::ptr_eq(&first, &second));
}

trait Named: Send + Sync {}

trait Leveled: Send + Sync {
    fn level(&self) -> u8;
}

#[allow(dead_code)]
struct ParametrizedImpl {
    name: Arc<dyn Named>,
    level: u8,
}

impl Leveled for ParametrizedImpl {
    fn level(&self) -> u8 {
        self.level
    }
}

impl Component for ParametrizedImpl {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::contract::<dyn Named>("name"), Dependency::value::<u8>("level")]
    }

    fn construct(args: Args) -> InstantiatorResult<Self> {
        Ok(Self {
            name: args.get("name")?,
            level: args.value("level")?,
        })
    }
}

implements!(ParametrizedImpl: dyn Leveled);

#[test]
#[traced_test]
fn unresolvable_dependency_names_parameter() {
    let container = Container::new(
        Registry::new().bind_with_params::<dyn Leveled, ParametrizedImpl>(Lifecycle::PerRequest, Params::new().with("level", 5_u8)),
    );

    let err = container.resolve::<dyn Leveled>().err().unwrap();
    match err {
        ResolveErrorKind::UnresolvableDependency { param, implementation } => {
            assert_eq!(param, "name");
            assert_eq!(implementation, TypeInfo::of::<ParametrizedImpl>());
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
#[traced_test]
fn value_parameter_is_never_resolved() {
    struct Anonymous;

    impl Named for Anonymous {}

    let container = Container::new(
        Registry::new()
            .bind_factory::<dyn Named, _>(Lifecycle::Singleton, || Ok(Arc::new(Anonymous) as Arc<dyn Named>))
            .bind_factory::<u8, _>(Lifecycle::Singleton, || Ok(Arc::new(9)))
            .bind::<dyn Leveled, ParametrizedImpl>(Lifecycle::PerRequest),
    );

    assert!(matches!(
        container.resolve::<dyn Leveled>(),
        Err(ResolveErrorKind::UnresolvableDependency { param: "level", .. })
    ));

    container.register(
        Registration::<dyn Leveled>::new()
            .implementation::<ParametrizedImpl>()
            .params(Params::new().with("level", 5_u8)),
    );
    assert_eq!(container.resolve::<dyn Leveled>().unwrap().level(), 5);
}

trait Left: Send + Sync {}
trait Right: Send + Sync {}

struct LeftImpl;
struct RightImpl;

impl Left for LeftImpl {}
impl Right for RightImpl {}

impl Component for LeftImpl {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::contract::<dyn Right>("right")]
    }

    fn construct(args: Args) -> InstantiatorResult<Self> {
        args.get::<dyn Right>("right")?;
        Ok(Self)
    }
}

impl Component for RightImpl {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::contract::<dyn Left>("left")]
    }

    fn construct(args: Args) -> InstantiatorResult<Self> {
        args.get::<dyn Left>("left")?;
        Ok(Self)
    }
}

implements!(LeftImpl: dyn Left);
implements!(RightImpl: dyn Right);

#[test]
#[traced_test]
fn cyclic_configuration_is_reported() {
    let container = Container::new(
        Registry::new()
            .bind::<dyn Left, LeftImpl>(Lifecycle::Singleton)
            .bind::<dyn Right, RightImpl>(Lifecycle::PerRequest),
    );

    let err = container.resolve::<dyn Left>().err().unwrap();
    let ResolveErrorKind::CyclicConfiguration { path } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(
        &**path,
        &[TypeInfo::of::<dyn Left>(), TypeInfo::of::<dyn Right>(), TypeInfo::of::<dyn Left>()]
    );
    assert_eq!(err.to_string(), "Cyclic configuration detected: Left -> Right -> Left");

    // Nothing is cached by the failed build
    assert!(container.resolve::<dyn Left>().is_err());
    assert!(Container::new_with_config(Registry::new(), Config::default()).config().detect_cycles);
}

#[test]
#[traced_test]
fn panic_inside_scope_leaves_scope() {
    let container = Container::new(
        Registry::new()
            .bind::<dyn Interface1, Class1>(Lifecycle::Singleton)
            .bind::<dyn Interface3, Class3>(Lifecycle::Scoped),
    );

    let mut leaked = None;
    let result = catch_unwind(AssertUnwindSafe(|| {
        container
            .with_scope(|scope| {
                leaked = Some(scope.resolve::<dyn Interface3>().unwrap());
                panic!("work failed");
            })
            .unwrap();
    }));

    assert!(result.is_err());
    assert!(!container.is_scope_active());
    assert!(matches!(
        container.resolve::<dyn Interface3>(),
        Err(ResolveErrorKind::ScopeInactive { .. })
    ));

    let leaked = leaked.unwrap();
    let fresh = container.with_scope(|scope| scope.resolve::<dyn Interface3>().unwrap()).unwrap();
    assert!(!Arc::ptr_eq(&leaked, &fresh));
}

#[test]
#[traced_test]
fn error_inside_scope_leaves_scope() {
    let container = Container::new(Registry::new().bind::<dyn Interface3, Class3>(Lifecycle::Scoped));

    let result = container.with_scope(|scope| scope.resolve::<dyn Interface3>()).unwrap();

    assert!(matches!(result, Err(ResolveErrorKind::UnresolvableDependency { param: "dep", .. })));
    assert!(!container.is_scope_active());
}

#[test]
#[traced_test]
fn failed_construction_is_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let container = Container::new(Registry::new().bind_factory::<dyn FixedValue, _>(Lifecycle::Singleton, {
        let attempts = attempts.clone();
        move || {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(anyhow!("database is not ready").into());
            }
            Ok(Arc::new(Fixed(1)) as Arc<dyn FixedValue>)
        }
    }));

    let err = container.resolve::<dyn FixedValue>().err().unwrap();
    assert!(matches!(err, ResolveErrorKind::Instantiate { .. }));
    assert!(err.to_string().contains("database is not ready"));

    let first = container.resolve::<dyn FixedValue>().unwrap();
    let second = container.resolve::<dyn FixedValue>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
#[traced_test]
fn concurrent_singleton_is_built_once() {
    const THREADS: usize = 8;

    let constructed = Arc::new(AtomicUsize::new(0));
    let container = Container::new(Registry::new().bind_factory::<dyn FixedValue, _>(Lifecycle::Singleton, {
        let constructed = constructed.clone();
        move || {
            constructed.fetch_add(1, Ordering::SeqCst);
            thread::yield_now();
            Ok(Arc::new(Fixed(3)) as Arc<dyn FixedValue>)
        }
    }));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.resolve::<dyn FixedValue>().unwrap()
            })
        })
        .collect();
    let instances: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
#[traced_test]
fn singleton_survives_build_of_replaced_binding() {
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));

    let container = Container::new(Registry::new().bind_factory::<dyn FixedValue, _>(Lifecycle::Singleton, {
        let entered = entered.clone();
        let release = release.clone();
        move || {
            entered.wait();
            release.wait();
            Ok(Arc::new(Fixed(1)) as Arc<dyn FixedValue>)
        }
    }));

    let slow = thread::spawn({
        let container = container.clone();
        move || container.resolve::<dyn FixedValue>().unwrap()
    });
    entered.wait();

    // The slow build holds the lock of the old binding only
    assert!(container.register(
        Registration::<dyn FixedValue>::new()
            .factory(|| Ok(Arc::new(Fixed(2)) as Arc<dyn FixedValue>))
            .lifecycle(Lifecycle::Singleton),
    ));
    let first = container.resolve::<dyn FixedValue>().unwrap();
    assert_eq!(first.value(), 2);

    release.wait();
    let from_slow = slow.join().unwrap();

    assert!(Arc::ptr_eq(&first, &from_slow));
    assert!(Arc::ptr_eq(&first, &container.resolve::<dyn FixedValue>().unwrap()));
}
