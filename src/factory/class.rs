use std::fmt;

use crate::component::{Component, Constructor};
use crate::context::Context;
use crate::registry::FactoryRegistry;

/// Class factory waiting for a context.
pub struct UnboundClassFactory<T, A = ()> {
    registry: FactoryRegistry,
    constructor: Constructor<T, A>,
}

impl<T: Component, A: 'static> UnboundClassFactory<T, A> {
    pub(crate) fn new(registry: FactoryRegistry, constructor: Constructor<T, A>) -> Self {
        Self { registry, constructor }
    }

    /// Binds the factory to `context`.
    pub fn bind(&self, context: &Context) -> ClassFactory<T, A> {
        ClassFactory {
            registry: self.registry.clone(),
            constructor: self.constructor.clone(),
            context: context.clone(),
        }
    }

    /// Binds the factory to a fresh, empty context.
    ///
    /// No extension can target that context until its handle is retrieved
    /// through [`ClassFactory::context`].
    pub fn bind_fresh(&self) -> ClassFactory<T, A> {
        self.bind(&Context::new())
    }

    pub fn name(&self) -> &str {
        self.constructor.name()
    }
}

/// Factory producing a new, independent instance per call.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{Component, Constructor, Context, FactoryRegistry};
///
/// struct Request { path: String }
///
/// impl Component for Request {
///     type Overrides = ();
///     fn apply_overrides(&mut self, _: ()) {}
/// }
///
/// let registry = FactoryRegistry::new();
/// let requests = registry
///     .class_factory(&Constructor::of(|_env, path: &'static str| Request { path: path.to_string() }))
///     .bind(&Context::new());
///
/// let mut first = requests.create("/a");
/// let second = requests.create("/b");
/// first.path.push_str("/edited");
///
/// assert_eq!(first.path, "/a/edited");
/// assert_eq!(second.path, "/b");
/// ```
pub struct ClassFactory<T, A = ()> {
    registry: FactoryRegistry,
    constructor: Constructor<T, A>,
    context: Context,
}

impl<T: Component, A: 'static> ClassFactory<T, A> {
    /// Constructs a base object with `args`, merges the extension registered
    /// for this context and returns the result.
    ///
    /// Panics raised by the base or extension constructor propagate unchanged.
    pub fn create(&self, args: A) -> T {
        self.registry.build_instance(&self.constructor, &self.context, args)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn name(&self) -> &str {
        self.constructor.name()
    }
}

impl<T, A> Clone for ClassFactory<T, A> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            constructor: self.constructor.clone(),
            context: self.context.clone(),
        }
    }
}

impl<T, A> fmt::Debug for ClassFactory<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassFactory")
            .field("name", &self.constructor.name())
            .field("context", &self.context)
            .finish()
    }
}
