#![cfg(feature = "snapshot")]

use ferrous_factory::{
    Component, Constructor, Context, Extension, ExtensionMode, FactoryRegistry, RegistryOptions,
    RegistrySnapshot,
};

struct Equalizer {
    bands: u8,
}

impl Component for Equalizer {
    type Overrides = u8;
    fn apply_overrides(&mut self, bands: u8) {
        self.bands = bands;
    }
}

struct Limiter;

impl Component for Limiter {
    type Overrides = ();
    fn apply_overrides(&mut self, _: ()) {}
}

#[test]
fn test_snapshot_lists_contexts_in_creation_order() {
    let registry = FactoryRegistry::with_options(RegistryOptions::default().with_label("studio"));
    let first = Context::labeled("first");
    let second = Context::new();

    registry.extend("Limiter", Extension::<Limiter>::replace_with(|_| Limiter), &second);
    registry.extend("Equalizer", Extension::<Equalizer>::override_with(|_| 31), &first);
    registry.extend("Limiter", Extension::<Limiter>::replace_with(|_| Limiter), &first);
    let eq = registry
        .singleton_factory(&Constructor::of(|_, ()| Equalizer { bands: 10 }))
        .bind(&first)
        .get_instance(());
    assert_eq!(eq.bands, 31);

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.label.as_deref(), Some("studio"));
    assert_eq!(snapshot.contexts.len(), 2);
    assert_eq!(snapshot.contexts[0].id, first.id());
    assert_eq!(snapshot.contexts[1].id, second.id());

    let first_entry = snapshot.context(&first).unwrap();
    assert_eq!(first_entry.label.as_deref(), Some("first"));
    let names: Vec<&str> = first_entry.extensions.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Equalizer", "Limiter"]);
    assert_eq!(first_entry.extensions[0].mode, ExtensionMode::Override);
    assert_eq!(first_entry.singletons, vec!["Equalizer".to_string()]);

    assert!(snapshot.context(&second).unwrap().singletons.is_empty());
    assert!(snapshot.context(&Context::new()).is_none());
}

#[test]
fn test_snapshot_json_parses_back() {
    let registry = FactoryRegistry::new();
    let ctx = Context::labeled("session");
    registry.extend("Equalizer", Extension::<Equalizer>::override_with(|_| 5), &ctx);

    let snapshot = registry.snapshot();
    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"captured_at\""));
    assert!(json.contains("Override"));

    let parsed: RegistrySnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}
