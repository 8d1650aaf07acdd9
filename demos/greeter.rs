//! Per-context greeters with override and replacement extensions.
//!
//! Run with `cargo run --example greeter`.

use ferrous_factory::{
    Component, Constructor, Context, Extension, FactoryRegistry, LoggingObserver,
};
use std::sync::Arc;

type Phrase = Arc<dyn Fn(&str) -> String + Send + Sync>;

struct Greeter {
    greet: Phrase,
    farewell: Phrase,
}

#[derive(Default)]
struct GreeterOverrides {
    greet: Option<Phrase>,
    farewell: Option<Phrase>,
}

impl Component for Greeter {
    type Overrides = GreeterOverrides;

    fn apply_overrides(&mut self, overrides: GreeterOverrides) {
        if let Some(greet) = overrides.greet {
            self.greet = greet;
        }
        if let Some(farewell) = overrides.farewell {
            self.farewell = farewell;
        }
    }
}

fn main() {
    let mut builder = FactoryRegistry::builder();
    builder.add_observer(Arc::new(LoggingObserver::with_prefix("[greeter]")));
    let registry = builder.build();

    let greeter = Constructor::of(|_env, ()| Greeter {
        greet: Arc::new(|who: &str| format!("hi {}", who)),
        farewell: Arc::new(|who: &str| format!("bye {}", who)),
    });

    let formal = Context::labeled("formal");
    let pirate = Context::labeled("pirate");
    let plain = Context::labeled("plain");

    // Formal keeps the base farewell
    registry.extend(
        "Greeter",
        Extension::<Greeter>::override_with(|_env| GreeterOverrides {
            greet: Some(Arc::new(|who: &str| format!("good day, {}", who))),
            ..Default::default()
        }),
        &formal,
    );

    // Pirate discards the base entirely
    registry.extend(
        "Greeter",
        Extension::<Greeter>::replace_with(|_env| Greeter {
            greet: Arc::new(|who: &str| format!("ahoy {}", who)),
            farewell: Arc::new(|who: &str| format!("fair winds, {}", who)),
        }),
        &pirate,
    );

    // Ignored: pirate already has an extension
    registry.extend(
        "Greeter",
        Extension::<Greeter>::override_with(|_env| GreeterOverrides::default()),
        &pirate,
    );

    for ctx in [&formal, &pirate, &plain] {
        let shared = registry.singleton_factory(&greeter).bind(ctx).get_instance(());
        println!("{}: {} / {}", ctx, (shared.greet)("Ada"), (shared.farewell)("Ada"));
    }

    let again = registry.singleton_factory(&greeter).bind(&formal).get_instance(());
    let cached = registry
        .get_singleton_instance::<Greeter>(&formal, "Greeter")
        .map(|instance| Arc::ptr_eq(&instance, &again))
        .unwrap_or(false);
    println!("formal singleton reused: {}", cached);
}
