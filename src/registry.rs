//! The factory registry: extension table, singleton cache and merge.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::component::{Component, ConstructionEnv, Constructor, ExtensionEnv};
use crate::config::RegistryOptions;
use crate::context::Context;
use crate::descriptors::ExtensionInfo;
use crate::error::{FactoryError, FactoryResult};
use crate::extension::{Extension, ExtensionDescriptor, ExtensionTable, Registration};
use crate::factory::{UnboundClassFactory, UnboundSingletonFactory};
use crate::internal::{construct_observed, Mutex};
use crate::observer::{LoggingObserver, Observers, RegistryObserver};
use crate::singleton::{Cached, SingletonCache, Stored};

/// Mutable registry state, guarded by a single lock.
pub(crate) struct RegistryState {
    pub(crate) extensions: ExtensionTable,
    pub(crate) singletons: SingletonCache,
}

struct RegistryInner {
    state: Mutex<RegistryState>,
    observers: Observers,
    options: RegistryOptions,
}

/// Composition root creating components, caching singletons per context and
/// merging registered extensions.
///
/// `FactoryRegistry` is a cheap handle; clones share the same extension
/// table and singleton cache. Entries live as long as any handle does.
///
/// Nothing in the default path fails: a missing extension returns the base
/// object, a missing singleton is `None`, and a second extension for the
/// same (context, name) is ignored so the first registration wins.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{Component, Constructor, Context, Extension, FactoryRegistry};
///
/// struct Greeter { greeting: String }
///
/// #[derive(Default)]
/// struct GreeterOverrides { greeting: Option<String> }
///
/// impl Component for Greeter {
///     type Overrides = GreeterOverrides;
///     fn apply_overrides(&mut self, o: GreeterOverrides) {
///         if let Some(greeting) = o.greeting {
///             self.greeting = greeting;
///         }
///     }
/// }
///
/// let registry = FactoryRegistry::new();
/// let greeter = Constructor::of(|_env, ()| Greeter { greeting: "hi".to_string() });
///
/// let ctx_a = Context::labeled("a");
/// let ctx_b = Context::labeled("b");
/// registry.extend(
///     "Greeter",
///     Extension::<Greeter>::override_with(|_env| GreeterOverrides {
///         greeting: Some("hello".to_string()),
///     }),
///     &ctx_a,
/// );
///
/// let factory = registry.class_factory(&greeter);
/// assert_eq!(factory.bind(&ctx_a).create(()).greeting, "hello");
/// assert_eq!(factory.bind(&ctx_b).create(()).greeting, "hi");
/// ```
#[derive(Clone)]
pub struct FactoryRegistry {
    inner: Arc<RegistryInner>,
}

impl FactoryRegistry {
    /// Creates an empty registry with default options and no observers.
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    /// Creates an empty registry configured by `options`.
    pub fn with_options(options: RegistryOptions) -> Self {
        RegistryBuilder::from_options(options).build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.inner.options
    }

    /// Returns `true` if both handles share the same state.
    pub fn ptr_eq(&self, other: &FactoryRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ===== Extensions =====

    /// Registers an extension for `(context, name)`.
    ///
    /// Only the first registration for a pair is kept; later attempts are
    /// no-ops reported to observers as duplicates. Passing `None` registers
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_factory::{Component, Constructor, Context, Extension, FactoryRegistry};
    ///
    /// struct Codec(&'static str);
    ///
    /// impl Component for Codec {
    ///     type Overrides = ();
    ///     fn apply_overrides(&mut self, _: ()) {}
    /// }
    ///
    /// let registry = FactoryRegistry::new();
    /// let ctx = Context::new();
    ///
    /// registry.extend("Codec", Extension::<Codec>::replace_with(|_| Codec("first")), &ctx);
    /// registry.extend("Codec", Extension::<Codec>::replace_with(|_| Codec("second")), &ctx);
    /// registry.extend::<Codec>("Codec", None, &ctx);
    ///
    /// let codec = registry
    ///     .class_factory(&Constructor::of(|_, ()| Codec("base")))
    ///     .bind(&ctx)
    ///     .create(());
    /// assert_eq!(codec.0, "first");
    /// ```
    pub fn extend<T: Component>(&self, name: &str, extension: impl Into<Option<Extension<T>>>, context: &Context) {
        let extension: Option<Extension<T>> = extension.into();
        let extension = match extension {
            Some(extension) => extension,
            None => return,
        };
        let mode = extension.mode();
        let descriptor = ExtensionDescriptor::new(Arc::from(name), extension);

        let outcome = {
            let mut state = self.inner.state.lock();
            match state.extensions.register(context, descriptor) {
                Registration::Stored => Ok(()),
                Registration::Duplicate => Err(state
                    .extensions
                    .record(context)
                    .get(name)
                    .map(|kept| kept.mode)
                    .unwrap_or(mode)),
            }
        };

        let observers = &self.inner.observers;
        match outcome {
            Ok(()) => observers.extension_registered(context, name, mode),
            Err(kept) => observers.duplicate_extension(context, name, kept, mode),
        }
    }

    /// Returns `true` if an extension is registered for `(context, name)`.
    pub fn has_extension(&self, context: &Context, name: &str) -> bool {
        self.inner.state.lock().extensions.find(context, name).is_some()
    }

    /// Lists the extensions registered for `context`, sorted by name.
    ///
    /// Like [`has_extension`](Self::has_extension) this never creates a
    /// record for a context the registry has not seen.
    pub fn extensions(&self, context: &Context) -> Vec<ExtensionInfo> {
        let state = self.inner.state.lock();
        let mut infos: Vec<ExtensionInfo> = match state.extensions.existing(context) {
            Some(record) => record.iter().map(ExtensionInfo::from_descriptor).collect(),
            None => Vec::new(),
        };
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Number of contexts the extension table holds a record for.
    pub fn context_count(&self) -> usize {
        self.inner.state.lock().extensions.context_count()
    }

    // ===== Factories =====

    /// Returns a class factory for `constructor`, to be bound to a context.
    pub fn class_factory<T: Component, A: 'static>(&self, constructor: &Constructor<T, A>) -> UnboundClassFactory<T, A> {
        UnboundClassFactory::new(self.clone(), constructor.clone())
    }

    /// Returns a singleton factory for `constructor`, to be bound to a context.
    pub fn singleton_factory<T: Component, A: 'static>(&self, constructor: &Constructor<T, A>) -> UnboundSingletonFactory<T, A> {
        UnboundSingletonFactory::new(self.clone(), constructor.clone())
    }

    // ===== Singleton cache =====

    /// Returns the cached singleton for `(context, name)`.
    ///
    /// `None` when nothing is cached or the cached instance is not a `T`.
    pub fn get_singleton_instance<T>(&self, context: &Context, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.cached_singleton(context, name)
            .and_then(|stored| stored.downcast::<T>().ok())
    }

    /// Like [`get_singleton_instance`](Self::get_singleton_instance) but
    /// distinguishes an instance of the wrong type from an absent one.
    pub fn try_get_singleton_instance<T>(&self, context: &Context, name: &str) -> FactoryResult<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        match self.cached_singleton(context, name) {
            None => Ok(None),
            Some(stored) => stored
                .downcast::<T>()
                .map(Some)
                .map_err(|_| FactoryError::TypeMismatch(type_name::<T>())),
        }
    }

    /// Returns the cached singleton or an error naming what went wrong.
    pub fn require_singleton_instance<T>(&self, context: &Context, name: &str) -> FactoryResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.try_get_singleton_instance(context, name)?
            .ok_or_else(|| FactoryError::NotFound(name.to_string()))
    }

    /// Caches `instance` for `(context, name)`, overwriting any existing entry.
    ///
    /// Singleton factory handles that already produced an instance keep
    /// returning it; handles bound afterwards pick up `instance`.
    pub fn set_singleton_instance<T>(&self, context: &Context, name: &str, instance: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        let replaced = self.inner.state.lock().singletons.set(context, name, Stored::new(instance));
        if replaced {
            self.inner.observers.singleton_replaced(context, name);
        }
    }

    /// Total number of cached singletons across all contexts.
    pub fn singleton_count(&self) -> usize {
        self.inner.state.lock().singletons.len()
    }

    /// Names of the singletons cached for `context`, in insertion order.
    pub fn singleton_names(&self, context: &Context) -> Vec<String> {
        self.inner
            .state
            .lock()
            .singletons
            .iter()
            .filter(|entry| entry.context == *context)
            .map(|entry| entry.name.to_string())
            .collect()
    }

    // ===== Internals shared with the factories =====

    pub(crate) fn observers(&self) -> &Observers {
        &self.inner.observers
    }

    #[cfg(feature = "snapshot")]
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut RegistryState) -> R) -> R {
        f(&mut self.inner.state.lock())
    }

    fn cached_singleton(&self, context: &Context, name: &str) -> Option<Stored> {
        self.inner.state.lock().singletons.get(context, name)
    }

    /// Looks up the shared singleton a factory for `T` should adopt.
    ///
    /// An entry of another type is a [`FactoryError::TypeMismatch`]; it is
    /// reported to observers and never counted as a reuse.
    pub(crate) fn shared_singleton<T: Component>(&self, context: &Context, name: &str) -> FactoryResult<Option<Arc<T>>> {
        match self.cached_singleton(context, name) {
            None => Ok(None),
            Some(stored) => self.adopt_singleton(context, name, stored).map(Some),
        }
    }

    /// Offers a freshly built singleton to the shared cache.
    ///
    /// If another handle cached one for the same key first, that instance
    /// wins and is returned instead.
    pub(crate) fn cache_singleton<T: Component>(&self, context: &Context, name: &str, instance: Arc<T>) -> FactoryResult<Arc<T>> {
        let cached = self
            .inner
            .state
            .lock()
            .singletons
            .find_or_insert(context, name, Stored::new(Arc::clone(&instance)));

        match cached {
            Cached::Inserted => {
                self.inner.observers.singleton_cached(context, name);
                Ok(instance)
            }
            Cached::Existing(stored) => self.adopt_singleton(context, name, stored),
        }
    }

    fn adopt_singleton<T: Component>(&self, context: &Context, name: &str, stored: Stored) -> FactoryResult<Arc<T>> {
        match stored.downcast::<T>() {
            Ok(instance) => {
                self.inner.observers.singleton_reused(context, name);
                Ok(instance)
            }
            Err(cached_type) => {
                self.inner
                    .observers
                    .singleton_type_mismatch(context, name, cached_type, type_name::<T>());
                Err(FactoryError::TypeMismatch(type_name::<T>()))
            }
        }
    }

    /// Constructs the base object and merges the matching extension.
    pub(crate) fn build_instance<T: Component, A>(&self, constructor: &Constructor<T, A>, context: &Context, args: A) -> T {
        let observers = &self.inner.observers;
        let started = Instant::now();
        let name = constructor.name();

        let env = ConstructionEnv::new(context, self);
        let base = construct_observed(observers, context, name, || constructor.construct(&env, args));
        let instance = self.merge(name, base, context);

        if observers.has_observers() {
            observers.instance_created(context, name, started.elapsed());
        }
        instance
    }

    /// Reconciles a freshly constructed base object with the extension
    /// registered for `(context, name)`.
    ///
    /// Override mode applies the extension's partial implementation onto
    /// `base`. Replacement mode drops `base` and returns the extension's
    /// object. Without an extension, or with one registered for a different
    /// component type, `base` is returned unchanged.
    pub(crate) fn merge<T: Component>(&self, name: &str, base: T, context: &Context) -> T {
        let descriptor = self.inner.state.lock().extensions.lookup(context, name);
        let observers = &self.inner.observers;

        let descriptor = match descriptor {
            Some(descriptor) => descriptor,
            None => return base,
        };
        let extension = match descriptor.typed::<T>() {
            Some(extension) => extension,
            None => {
                observers.extension_type_mismatch(context, name, descriptor.component_type, type_name::<T>());
                return base;
            }
        };

        let merged = match extension {
            Extension::Override(implementation) => {
                let overrides = {
                    let env = ExtensionEnv::new(context, self, Some(&base));
                    construct_observed(observers, context, name, || implementation(&env))
                };
                let mut base = base;
                base.apply_overrides(overrides);
                base
            }
            Extension::Replace(implementation) => {
                let env = ExtensionEnv::new(context, self, None);
                let replacement = construct_observed(observers, context, name, || implementation(&env));
                drop(base);
                replacement
            }
        };

        observers.extension_applied(context, name, descriptor.mode);
        merged
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("FactoryRegistry")
            .field("label", &self.inner.options.label)
            .field("contexts", &state.extensions.context_count())
            .field("singletons", &state.singletons.len())
            .finish()
    }
}

/// Builder for [`FactoryRegistry`].
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{FactoryRegistry, LoggingObserver, RegistryOptions};
/// use std::sync::Arc;
///
/// let mut builder = FactoryRegistry::builder();
/// builder
///     .options(RegistryOptions::default().with_label("player"))
///     .add_observer(Arc::new(LoggingObserver::new()));
/// let registry = builder.build();
///
/// assert_eq!(registry.options().label.as_deref(), Some("player"));
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    observers: Observers,
    options: RegistryOptions,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: RegistryOptions) -> Self {
        Self {
            observers: Observers::new(),
            options,
        }
    }

    /// Replaces the registry options.
    pub fn options(&mut self, options: RegistryOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Adds an observer notified of registry events.
    pub fn add_observer(&mut self, observer: Arc<dyn RegistryObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    pub fn build(mut self) -> FactoryRegistry {
        if self.options.log_events {
            let logger = LoggingObserver::with_prefix(self.options.log_prefix.clone());
            self.observers.add(Arc::new(logger));
        }

        FactoryRegistry {
            inner: Arc::new(RegistryInner {
                state: Mutex::new(RegistryState {
                    extensions: ExtensionTable::new(),
                    singletons: SingletonCache::new(),
                }),
                observers: self.observers,
                options: self.options,
            }),
        }
    }
}
