//! Component surfaces, base constructors and construction environments.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::registry::FactoryRegistry;

/// Capability surface of a named component.
///
/// A component is the object handed to the host by a factory. Extensions
/// registered in override mode produce a partial implementation
/// ([`Component::Overrides`]) which is applied member by member onto a freshly
/// constructed base object; members the overrides leave out keep the base
/// behavior.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::Component;
/// use std::sync::Arc;
///
/// type Greet = Arc<dyn Fn() -> String + Send + Sync>;
///
/// struct Greeter {
///     greet: Greet,
///     farewell: Greet,
/// }
///
/// #[derive(Default)]
/// struct GreeterOverrides {
///     greet: Option<Greet>,
///     farewell: Option<Greet>,
/// }
///
/// impl Component for Greeter {
///     type Overrides = GreeterOverrides;
///
///     fn apply_overrides(&mut self, overrides: GreeterOverrides) {
///         if let Some(greet) = overrides.greet {
///             self.greet = greet;
///         }
///         if let Some(farewell) = overrides.farewell {
///             self.farewell = farewell;
///         }
///     }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Partial implementation of this component's surface.
    type Overrides: 'static;

    /// Replaces every member present in `overrides`, keeping the rest.
    fn apply_overrides(&mut self, overrides: Self::Overrides);
}

/// Environment handed to base constructors.
pub struct ConstructionEnv<'a> {
    context: &'a Context,
    registry: &'a FactoryRegistry,
}

impl<'a> ConstructionEnv<'a> {
    pub(crate) fn new(context: &'a Context, registry: &'a FactoryRegistry) -> Self {
        Self { context, registry }
    }

    /// Context the component is being built for.
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Registry performing the construction.
    ///
    /// Constructors may use it to pull in collaborators bound to the same
    /// context; the registry lock is never held while a constructor runs.
    pub fn registry(&self) -> &'a FactoryRegistry {
        self.registry
    }
}

/// Environment handed to extension implementations.
///
/// In override mode [`ExtensionEnv::parent`] exposes the base object the
/// overrides will be applied to. In replacement mode there is no parent.
pub struct ExtensionEnv<'a, T> {
    context: &'a Context,
    registry: &'a FactoryRegistry,
    parent: Option<&'a T>,
}

impl<'a, T> ExtensionEnv<'a, T> {
    pub(crate) fn new(context: &'a Context, registry: &'a FactoryRegistry, parent: Option<&'a T>) -> Self {
        Self { context, registry, parent }
    }

    /// Context the extension is being applied in.
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Registry performing the merge.
    ///
    /// As with [`ConstructionEnv::registry`], the registry lock is not held
    /// while the extension runs.
    pub fn registry(&self) -> &'a FactoryRegistry {
        self.registry
    }

    /// Base object being extended (override mode only).
    pub fn parent(&self) -> Option<&'a T> {
        self.parent
    }
}

type BuildFn<T, A> = dyn Fn(&ConstructionEnv<'_>, A) -> T + Send + Sync;

/// Named base constructor for a component.
///
/// The name is the key extensions and singletons are registered under. It
/// must be unique per logical component within a context.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{Component, Constructor};
///
/// struct Counter { start: u32 }
///
/// impl Component for Counter {
///     type Overrides = ();
///     fn apply_overrides(&mut self, _: ()) {}
/// }
///
/// let named = Constructor::new("Counter", |_env, start: u32| Counter { start });
/// assert_eq!(named.name(), "Counter");
///
/// let derived = Constructor::of(|_env, ()| Counter { start: 0 });
/// assert_eq!(derived.name(), "Counter");
/// ```
pub struct Constructor<T, A = ()> {
    name: Arc<str>,
    build: Arc<BuildFn<T, A>>,
}

impl<T: Component, A: 'static> Constructor<T, A> {
    /// Creates a constructor registered under an explicit component name.
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&ConstructionEnv<'_>, A) -> T + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            build: Arc::new(build),
        }
    }

    /// Creates a constructor named after the component type.
    ///
    /// The name is the type name with module paths stripped from the type
    /// and each generic argument, e.g. `Greeter<Vec<u8>>` for
    /// `app::audio::Greeter<alloc::vec::Vec<u8>>`. Distinct instantiations
    /// of a generic component therefore get distinct names.
    pub fn of<F>(build: F) -> Self
    where
        F: Fn(&ConstructionEnv<'_>, A) -> T + Send + Sync + 'static,
    {
        Self::new(short_type_name::<T>(), build)
    }
}

impl<T, A> Constructor<T, A> {
    /// Component name used for extension and singleton lookups.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn construct(&self, env: &ConstructionEnv<'_>, args: A) -> T {
        (self.build)(env, args)
    }
}

impl<T, A> Clone for Constructor<T, A> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            build: Arc::clone(&self.build),
        }
    }
}

impl<T, A> fmt::Debug for Constructor<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .field("component", &type_name::<T>())
            .finish()
    }
}

pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();

    for ch in full.chars() {
        match ch {
            // Path separator: drop the module prefix collected so far
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*' => {
                short.push_str(&segment);
                segment.clear();
                short.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    short.push_str(&segment);
    short
}
