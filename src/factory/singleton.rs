use std::fmt;
use std::sync::Arc;

use crate::component::{Component, Constructor};
use crate::context::Context;
use crate::error::FactoryResult;
use crate::internal::Slot;
use crate::registry::FactoryRegistry;

/// Singleton factory waiting for a context.
pub struct UnboundSingletonFactory<T, A = ()> {
    registry: FactoryRegistry,
    constructor: Constructor<T, A>,
}

impl<T: Component, A: 'static> UnboundSingletonFactory<T, A> {
    pub(crate) fn new(registry: FactoryRegistry, constructor: Constructor<T, A>) -> Self {
        Self { registry, constructor }
    }

    /// Binds the factory to `context`.
    ///
    /// An instance already cached for `(context, name)` is captured now and
    /// returned by every [`SingletonFactory::get_instance`] call.
    pub fn bind(&self, context: &Context) -> SingletonFactory<T, A> {
        let cached = self
            .registry
            .get_singleton_instance::<T>(context, self.constructor.name());

        SingletonFactory {
            registry: self.registry.clone(),
            constructor: self.constructor.clone(),
            context: context.clone(),
            slot: Arc::new(Slot::new(cached)),
        }
    }

    /// Binds the factory to a fresh, empty context.
    pub fn bind_fresh(&self) -> SingletonFactory<T, A> {
        self.bind(&Context::new())
    }

    pub fn name(&self) -> &str {
        self.constructor.name()
    }
}

/// Factory returning one cached instance per (context, component name).
///
/// The handle keeps its own slot: once it has produced an instance it keeps
/// returning that exact `Arc`, even if the shared cache entry is later
/// overwritten with [`FactoryRegistry::set_singleton_instance`]. Clones of
/// the handle share the slot.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{Component, Constructor, Context, FactoryRegistry};
/// use std::sync::Arc;
///
/// struct Clock { ticks: u64 }
///
/// impl Component for Clock {
///     type Overrides = ();
///     fn apply_overrides(&mut self, _: ()) {}
/// }
///
/// let registry = FactoryRegistry::new();
/// let ctx = Context::new();
/// let clocks = registry
///     .singleton_factory(&Constructor::of(|_env, ()| Clock { ticks: 0 }))
///     .bind(&ctx);
///
/// let a = clocks.get_instance(());
/// let b = clocks.get_instance(());
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let cached = registry.get_singleton_instance::<Clock>(&ctx, "Clock").unwrap();
/// assert!(Arc::ptr_eq(&a, &cached));
/// ```
pub struct SingletonFactory<T, A = ()> {
    registry: FactoryRegistry,
    constructor: Constructor<T, A>,
    context: Context,
    slot: Arc<Slot<Arc<T>>>,
}

impl<T: Component, A: 'static> SingletonFactory<T, A> {
    /// Returns the singleton, constructing it on first use.
    ///
    /// `args` are only consumed by the construction; once an instance exists
    /// they are ignored. A panicking constructor leaves nothing cached.
    ///
    /// # Panics
    ///
    /// Panics if the shared cache holds an instance of another type under
    /// this component's name. Use [`try_get_instance`](Self::try_get_instance)
    /// to handle that case.
    pub fn get_instance(&self, args: A) -> Arc<T> {
        self.try_get_instance(args)
            .unwrap_or_else(|e| panic!("Failed to create singleton {}: {}", self.name(), e))
    }

    /// Like [`get_instance`](Self::get_instance), but reports a foreign
    /// cache entry as [`FactoryError::TypeMismatch`](crate::FactoryError::TypeMismatch) instead of panicking.
    ///
    /// On mismatch nothing is constructed or cached and the handle stays
    /// uninitialized.
    pub fn try_get_instance(&self, args: A) -> FactoryResult<Arc<T>> {
        if let Some(instance) = self.slot.get() {
            return Ok(instance);
        }

        let name = self.constructor.name();
        if let Some(instance) = self.registry.shared_singleton::<T>(&self.context, name)? {
            return Ok(self.slot.fill(instance));
        }

        let built = Arc::new(self.registry.build_instance(&self.constructor, &self.context, args));
        let instance = self.registry.cache_singleton(&self.context, name, built)?;
        Ok(self.slot.fill(instance))
    }

    /// Returns `true` once this handle holds an instance.
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn name(&self) -> &str {
        self.constructor.name()
    }
}

impl<T, A> Clone for SingletonFactory<T, A> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            constructor: self.constructor.clone(),
            context: self.context.clone(),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T, A> fmt::Debug for SingletonFactory<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonFactory")
            .field("name", &self.constructor.name())
            .field("context", &self.context)
            .finish()
    }
}
