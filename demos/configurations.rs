use std::sync::Arc;

use wirebox::{implements, Args, Component, Container, Dependency, InstantiatorResult, Lifecycle, Registry};

trait Interface1: Send + Sync {
    fn run(&self);
}

trait Interface2: Send + Sync {
    fn run(&self);
}

trait Interface3: Send + Sync {
    fn execute(&self);
}

// Components without dependencies
macro_rules! leaf_component {
    ($name:ident : $contract:ty => $message:literal) => {
        struct $name;

        impl $name {
            fn print(&self) {
                println!($message);
            }
        }

        impl Component for $name {
            fn dependencies() -> Vec<Dependency> {
                Vec::new()
            }

            fn construct(_args: Args) -> InstantiatorResult<Self> {
                Ok(Self)
            }
        }

        implements!($name: $contract);
    };
}

leaf_component!(Class1Debug: dyn Interface1 => "Debug: Class1 doing something");
leaf_component!(Class1Release: dyn Interface1 => "Release: Class1 doing something");
leaf_component!(Class2Debug: dyn Interface2 => "Debug: Class2 running");
leaf_component!(Class2Release: dyn Interface2 => "Release: Class2 running");

impl Interface1 for Class1Debug {
    fn run(&self) {
        self.print();
    }
}

impl Interface1 for Class1Release {
    fn run(&self) {
        self.print();
    }
}

impl Interface2 for Class2Debug {
    fn run(&self) {
        self.print();
    }
}

impl Interface2 for Class2Release {
    fn run(&self) {
        self.print();
    }
}

// Debug flavour depends on `Interface1`
struct Class3Debug {
    dep: Arc<dyn Interface1>,
}

impl Interface3 for Class3Debug {
    fn execute(&self) {
        println!("Debug: Class3 executing with dependency:");
        self.dep.run();
    }
}

impl Component for Class3Debug {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::contract::<dyn Interface1>("dep")]
    }

    fn construct(args: Args) -> InstantiatorResult<Self> {
        Ok(Self { dep: args.get("dep")? })
    }
}

// Release flavour depends on `Interface2`
struct Class3Release {
    dep: Arc<dyn Interface2>,
}

impl Interface3 for Class3Release {
    fn execute(&self) {
        println!("Release: Class3 executing with dependency:");
        self.dep.run();
    }
}

impl Component for Class3Release {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::contract::<dyn Interface2>("dep")]
    }

    fn construct(args: Args) -> InstantiatorResult<Self> {
        Ok(Self { dep: args.get("dep")? })
    }
}

implements!(Class3Debug: dyn Interface3);
implements!(Class3Release: dyn Interface3);

fn debug_registry() -> Registry {
    Registry::new()
        .bind::<dyn Interface1, Class1Debug>(Lifecycle::Singleton)
        .bind::<dyn Interface2, Class2Debug>(Lifecycle::PerRequest)
        .bind::<dyn Interface3, Class3Debug>(Lifecycle::Scoped)
}

fn release_registry() -> Registry {
    Registry::new()
        .bind::<dyn Interface1, Class1Release>(Lifecycle::PerRequest)
        .bind::<dyn Interface2, Class2Release>(Lifecycle::Singleton)
        .bind::<dyn Interface3, Class3Release>(Lifecycle::Scoped)
}

fn main() -> anyhow::Result<()> {
    println!("=== DEBUG CONFIGURATION ===");
    let container = Container::new(debug_registry());

    let first = container.with_scope(|scope| -> anyhow::Result<_> {
        let first = scope.resolve::<dyn Interface3>()?;
        first.execute();
        let second = scope.resolve::<dyn Interface3>()?;
        println!("Scoped same object: {}", Arc::ptr_eq(&first, &second));
        Ok(first)
    })??;

    println!("\n=== NEW SCOPE ===");
    container.with_scope(|scope| -> anyhow::Result<()> {
        let third = scope.resolve::<dyn Interface3>()?;
        println!("New scoped object is the previous one: {}", Arc::ptr_eq(&first, &third));
        Ok(())
    })??;

    println!("\n=== RELEASE CONFIGURATION ===");
    let container = Container::new(release_registry());

    container.with_scope(|scope| -> anyhow::Result<()> {
        scope.resolve::<dyn Interface3>()?.execute();
        Ok(())
    })??;

    Ok(())
}
