//! Extension definitions and the per-context extension table.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::component::{Component, ExtensionEnv};
use crate::context::Context;
use crate::internal::Map;

type OverrideFn<T> = dyn Fn(&ExtensionEnv<'_, T>) -> <T as Component>::Overrides + Send + Sync;
type ReplaceFn<T> = dyn Fn(&ExtensionEnv<'_, T>) -> T + Send + Sync;

/// How an extension is merged with the base object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtensionMode {
    /// Patch the members the extension provides onto the base object
    Override,
    /// Discard the base object and return the extension's object
    Replace,
}

impl ExtensionMode {
    /// Returns `true` for [`ExtensionMode::Override`].
    pub fn is_override(self) -> bool {
        matches!(self, ExtensionMode::Override)
    }
}

impl fmt::Display for ExtensionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionMode::Override => f.write_str("override"),
            ExtensionMode::Replace => f.write_str("replace"),
        }
    }
}

/// An alternative or partial implementation of a named component.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{Component, Extension, ExtensionMode};
///
/// struct Volume { level: u8, muted: bool }
///
/// #[derive(Default)]
/// struct VolumeOverrides { level: Option<u8> }
///
/// impl Component for Volume {
///     type Overrides = VolumeOverrides;
///     fn apply_overrides(&mut self, o: VolumeOverrides) {
///         if let Some(level) = o.level {
///             self.level = level;
///         }
///     }
/// }
///
/// // Keep `muted` from the base, only change the level
/// let louder = Extension::<Volume>::override_with(|env| VolumeOverrides {
///     level: env.parent().map(|base| base.level.saturating_add(10)),
/// });
/// assert_eq!(louder.mode(), ExtensionMode::Override);
///
/// // Ignore the base entirely
/// let silent = Extension::<Volume>::replace_with(|_env| Volume { level: 0, muted: true });
/// assert_eq!(silent.mode(), ExtensionMode::Replace);
/// ```
pub enum Extension<T: Component> {
    /// Selective member override, receives the base object as parent
    Override(Arc<OverrideFn<T>>),
    /// Full replacement, receives no parent
    Replace(Arc<ReplaceFn<T>>),
}

impl<T: Component> Extension<T> {
    /// Creates an override-mode extension.
    pub fn override_with<F>(implementation: F) -> Self
    where
        F: Fn(&ExtensionEnv<'_, T>) -> T::Overrides + Send + Sync + 'static,
    {
        Extension::Override(Arc::new(implementation))
    }

    /// Creates a replacement-mode extension.
    pub fn replace_with<F>(implementation: F) -> Self
    where
        F: Fn(&ExtensionEnv<'_, T>) -> T + Send + Sync + 'static,
    {
        Extension::Replace(Arc::new(implementation))
    }

    pub fn mode(&self) -> ExtensionMode {
        match self {
            Extension::Override(_) => ExtensionMode::Override,
            Extension::Replace(_) => ExtensionMode::Replace,
        }
    }
}

impl<T: Component> Clone for Extension<T> {
    fn clone(&self) -> Self {
        match self {
            Extension::Override(f) => Extension::Override(Arc::clone(f)),
            Extension::Replace(f) => Extension::Replace(Arc::clone(f)),
        }
    }
}

impl<T: Component> fmt::Debug for Extension<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("component", &type_name::<T>())
            .field("mode", &self.mode())
            .finish()
    }
}

/// Registered extension with its implementation type-erased.
#[derive(Clone)]
pub(crate) struct ExtensionDescriptor {
    pub(crate) name: Arc<str>,
    pub(crate) mode: ExtensionMode,
    pub(crate) component_type: &'static str,
    implementation: Arc<dyn Any + Send + Sync>,
}

impl ExtensionDescriptor {
    pub(crate) fn new<T: Component>(name: Arc<str>, extension: Extension<T>) -> Self {
        Self {
            name,
            mode: extension.mode(),
            component_type: type_name::<T>(),
            implementation: Arc::new(extension),
        }
    }

    /// Recovers the typed extension, `None` if registered for another type.
    pub(crate) fn typed<T: Component>(&self) -> Option<Extension<T>> {
        self.implementation.downcast_ref::<Extension<T>>().cloned()
    }
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Registration {
    Stored,
    /// An extension already exists for the name; the first one is kept
    Duplicate,
}

/// Extensions registered for one context, keyed by component name.
#[derive(Default)]
pub(crate) struct ExtensionContextRecord {
    entries: Map<Arc<str>, ExtensionDescriptor>,
}

impl ExtensionContextRecord {
    pub(crate) fn get(&self, name: &str) -> Option<&ExtensionDescriptor> {
        self.entries.get(name)
    }

    pub(crate) fn insert_first(&mut self, descriptor: ExtensionDescriptor) -> Registration {
        if self.entries.contains_key(&*descriptor.name) {
            return Registration::Duplicate;
        }
        self.entries.insert(Arc::clone(&descriptor.name), descriptor);
        Registration::Stored
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ExtensionDescriptor> {
        self.entries.values()
    }
}

/// Context-scoped extension table.
///
/// Exactly one record exists per context; records are created lazily on the
/// first lookup or registration touching that context.
#[derive(Default)]
pub(crate) struct ExtensionTable {
    records: Map<Context, ExtensionContextRecord>,
}

impl ExtensionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, context: &Context) -> &mut ExtensionContextRecord {
        self.records.entry(context.clone()).or_default()
    }

    pub(crate) fn register(&mut self, context: &Context, descriptor: ExtensionDescriptor) -> Registration {
        self.record(context).insert_first(descriptor)
    }

    pub(crate) fn lookup(&mut self, context: &Context, name: &str) -> Option<ExtensionDescriptor> {
        self.record(context).get(name).cloned()
    }

    /// Record for `context` without creating one.
    pub(crate) fn existing(&self, context: &Context) -> Option<&ExtensionContextRecord> {
        self.records.get(context)
    }

    /// Read-only lookup; leaves the table untouched.
    pub(crate) fn find(&self, context: &Context, name: &str) -> Option<&ExtensionDescriptor> {
        self.existing(context).and_then(|record| record.get(name))
    }

    pub(crate) fn context_count(&self) -> usize {
        self.records.len()
    }

    #[cfg(feature = "snapshot")]
    pub(crate) fn records(&self) -> impl Iterator<Item = (&Context, &ExtensionContextRecord)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(u32);

    impl Component for Probe {
        type Overrides = u32;
        fn apply_overrides(&mut self, value: u32) {
            self.0 = value;
        }
    }

    struct Other;

    impl Component for Other {
        type Overrides = ();
        fn apply_overrides(&mut self, _: ()) {}
    }

    fn descriptor(name: &str, value: u32) -> ExtensionDescriptor {
        ExtensionDescriptor::new(
            Arc::from(name),
            Extension::<Probe>::replace_with(move |_| Probe(value)),
        )
    }

    #[test]
    fn first_registration_wins() {
        let mut table = ExtensionTable::new();
        let ctx = Context::new();

        assert_eq!(table.register(&ctx, descriptor("Probe", 1)), Registration::Stored);
        assert_eq!(table.register(&ctx, descriptor("Probe", 2)), Registration::Duplicate);

        let stored = table.lookup(&ctx, "Probe").unwrap();
        match stored.typed::<Probe>().unwrap() {
            Extension::Replace(f) => {
                let registry = crate::FactoryRegistry::new();
                let env = ExtensionEnv::new(&ctx, &registry, None);
                assert_eq!(f(&env).0, 1);
            }
            Extension::Override(_) => panic!("expected replacement"),
        }
    }

    #[test]
    fn lookup_creates_record_once_per_context() {
        let mut table = ExtensionTable::new();
        let a = Context::new();
        let b = Context::new();

        assert!(table.lookup(&a, "Probe").is_none());
        assert!(table.lookup(&a, "Probe").is_none());
        assert_eq!(table.context_count(), 1);

        table.register(&b, descriptor("Probe", 3));
        assert_eq!(table.context_count(), 2);
        assert!(table.lookup(&a, "Probe").is_none());
    }

    #[test]
    fn find_does_not_create_records() {
        let mut table = ExtensionTable::new();
        let ctx = Context::new();

        assert!(table.find(&ctx, "Probe").is_none());
        assert!(table.existing(&ctx).is_none());
        assert_eq!(table.context_count(), 0);

        table.register(&ctx, descriptor("Probe", 4));
        assert!(table.find(&ctx, "Probe").is_some());
        assert!(table.find(&ctx, "Other").is_none());
        assert_eq!(table.context_count(), 1);
    }

    #[test]
    fn typed_rejects_other_component_types() {
        let stored = descriptor("Probe", 1);
        assert!(stored.typed::<Other>().is_none());
        assert!(stored.typed::<Probe>().is_some());
        assert_eq!(stored.mode, ExtensionMode::Replace);
    }
}
