/// Property-based tests for extension registration and the singleton cache
///
/// These tests use proptest to generate random registration sequences and
/// verify the invariants that must hold for all of them.

use ferrous_factory::{Component, Constructor, Context, Extension, FactoryRegistry};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug)]
struct Tuner {
    station: u32,
    label: String,
}

impl Component for Tuner {
    type Overrides = Option<String>;

    fn apply_overrides(&mut self, label: Option<String>) {
        if let Some(label) = label {
            self.label = label;
        }
    }
}

fn tuner() -> Constructor<Tuner, u32> {
    Constructor::of(|_, station| Tuner {
        station,
        label: format!("station_{}", station),
    })
}

// Property: the first extension registered for a (context, name) pair wins
proptest! {
    #[test]
    fn first_registration_wins(stations in prop::collection::vec(0u32..1000, 1..10)) {
        let registry = FactoryRegistry::new();
        let ctx = Context::new();

        for station in &stations {
            let station = *station;
            registry.extend(
                "Tuner",
                Extension::<Tuner>::replace_with(move |_| Tuner { station, label: "ext".into() }),
                &ctx,
            );
        }

        let created = registry.class_factory(&tuner()).bind(&ctx).create(5000);
        prop_assert_eq!(created.station, stations[0]);
        prop_assert_eq!(registry.extensions(&ctx).len(), 1);
    }
}

proptest! {
    #[test]
    fn set_then_get_returns_same_instance(station in 0u32..1000, name in "[A-Z][a-z]{1,12}") {
        let registry = FactoryRegistry::new();
        let ctx = Context::new();
        let instance = Arc::new(Tuner { station, label: name.clone() });

        registry.set_singleton_instance(&ctx, &name, Arc::clone(&instance));

        let cached = registry.get_singleton_instance::<Tuner>(&ctx, &name).unwrap();
        prop_assert!(Arc::ptr_eq(&cached, &instance));
        prop_assert!(registry.get_singleton_instance::<Tuner>(&Context::new(), &name).is_none());
    }
}

proptest! {
    #[test]
    fn override_keeps_unpatched_members(station in 0u32..1000, label in proptest::option::of("[a-z]{1,8}")) {
        let registry = FactoryRegistry::new();
        let ctx = Context::new();
        let patch = label.clone();
        registry.extend("Tuner", Extension::<Tuner>::override_with(move |_| patch.clone()), &ctx);

        let created = registry.class_factory(&tuner()).bind(&ctx).create(station);
        prop_assert_eq!(created.station, station);
        match label {
            Some(label) => prop_assert_eq!(created.label, label),
            None => prop_assert_eq!(created.label, format!("station_{}", station)),
        }
    }
}

proptest! {
    #[test]
    fn singletons_are_isolated_per_context(stations in prop::collection::vec(0u32..1000, 1..8)) {
        let registry = FactoryRegistry::new();
        let factory = registry.singleton_factory(&tuner());
        let contexts: Vec<Context> = stations.iter().map(|_| Context::new()).collect();

        let instances: Vec<Arc<Tuner>> = contexts
            .iter()
            .zip(&stations)
            .map(|(ctx, station)| factory.bind(ctx).get_instance(*station))
            .collect();

        for (i, (ctx, instance)) in contexts.iter().zip(&instances).enumerate() {
            prop_assert_eq!(instance.station, stations[i]);
            let again = factory.bind(ctx).get_instance(9999);
            prop_assert!(Arc::ptr_eq(&again, instance));
        }
        prop_assert_eq!(registry.singleton_count(), stations.len());
    }
}

proptest! {
    #[test]
    fn class_factories_never_share(count in 1usize..16) {
        let registry = FactoryRegistry::new();
        let factory = registry.class_factory(&tuner()).bind_fresh();

        let created: Vec<Tuner> = (0..count).map(|i| factory.create(i as u32)).collect();
        for (i, tuner) in created.iter().enumerate() {
            prop_assert_eq!(tuner.station, i as u32);
        }
        prop_assert_eq!(registry.singleton_count(), 0);
    }
}
