//! Diagnostic observers for registry events.
//!
//! The registry never reports "not found" or "already registered" as errors.
//! Observers are the way to see those events anyway, most usefully duplicate
//! extension registrations that were silently ignored.

use std::sync::Arc;
use std::time::Duration;

use crate::context::Context;
use crate::extension::ExtensionMode;

/// Observer trait for registry events.
///
/// Every method has an empty default implementation, so observers only
/// implement the events they care about. Calls are made synchronously and
/// never while the registry lock is held; an observer may call back into
/// the registry.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{Context, ExtensionMode, FactoryRegistry, RegistryObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct DuplicateCounter(AtomicUsize);
///
/// impl RegistryObserver for DuplicateCounter {
///     fn duplicate_extension(&self, _ctx: &Context, name: &str, _kept: ExtensionMode, _rejected: ExtensionMode) {
///         eprintln!("extension for {} registered twice", name);
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let counter = Arc::new(DuplicateCounter::default());
/// let mut builder = FactoryRegistry::builder();
/// builder.add_observer(counter.clone());
/// let registry = builder.build();
/// # let _ = registry;
/// assert_eq!(counter.0.load(Ordering::SeqCst), 0);
/// ```
pub trait RegistryObserver: Send + Sync {
    /// An extension was stored for `(context, name)`.
    fn extension_registered(&self, _context: &Context, _name: &str, _mode: ExtensionMode) {}

    /// A registration was ignored because `(context, name)` already had one.
    fn duplicate_extension(&self, _context: &Context, _name: &str, _kept: ExtensionMode, _rejected: ExtensionMode) {}

    /// An extension was merged into a freshly constructed object.
    fn extension_applied(&self, _context: &Context, _name: &str, _mode: ExtensionMode) {}

    /// An extension exists for the name but was registered for another
    /// component type; the base object is returned unchanged.
    fn extension_type_mismatch(&self, _context: &Context, _name: &str, _registered: &'static str, _requested: &'static str) {}

    /// A base object was constructed and merged.
    fn instance_created(&self, _context: &Context, _name: &str, _duration: Duration) {}

    /// A newly constructed singleton entered the shared cache.
    fn singleton_cached(&self, _context: &Context, _name: &str) {}

    /// A singleton factory adopted an instance already in the shared cache.
    fn singleton_reused(&self, _context: &Context, _name: &str) {}

    /// The shared cache holds an instance of another type under the name a
    /// singleton factory asked for. Nothing is adopted or cached.
    fn singleton_type_mismatch(&self, _context: &Context, _name: &str, _cached: &'static str, _requested: &'static str) {}

    /// `set_singleton_instance` overwrote an existing entry.
    fn singleton_replaced(&self, _context: &Context, _name: &str) {}

    /// A base or extension constructor panicked. The panic still propagates.
    fn construction_panicked(&self, _context: &Context, _name: &str, _message: &str) {}
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn extension_registered(&self, context: &Context, name: &str, mode: ExtensionMode) {
        for observer in &self.observers {
            observer.extension_registered(context, name, mode);
        }
    }

    #[inline]
    pub(crate) fn duplicate_extension(&self, context: &Context, name: &str, kept: ExtensionMode, rejected: ExtensionMode) {
        for observer in &self.observers {
            observer.duplicate_extension(context, name, kept, rejected);
        }
    }

    #[inline]
    pub(crate) fn extension_applied(&self, context: &Context, name: &str, mode: ExtensionMode) {
        for observer in &self.observers {
            observer.extension_applied(context, name, mode);
        }
    }

    #[inline]
    pub(crate) fn extension_type_mismatch(&self, context: &Context, name: &str, registered: &'static str, requested: &'static str) {
        for observer in &self.observers {
            observer.extension_type_mismatch(context, name, registered, requested);
        }
    }

    #[inline]
    pub(crate) fn instance_created(&self, context: &Context, name: &str, duration: Duration) {
        for observer in &self.observers {
            observer.instance_created(context, name, duration);
        }
    }

    #[inline]
    pub(crate) fn singleton_cached(&self, context: &Context, name: &str) {
        for observer in &self.observers {
            observer.singleton_cached(context, name);
        }
    }

    #[inline]
    pub(crate) fn singleton_reused(&self, context: &Context, name: &str) {
        for observer in &self.observers {
            observer.singleton_reused(context, name);
        }
    }

    pub(crate) fn singleton_type_mismatch(&self, context: &Context, name: &str, cached: &'static str, requested: &'static str) {
        for observer in &self.observers {
            observer.singleton_type_mismatch(context, name, cached, requested);
        }
    }

    #[inline]
    pub(crate) fn singleton_replaced(&self, context: &Context, name: &str) {
        for observer in &self.observers {
            observer.singleton_replaced(context, name);
        }
    }

    pub(crate) fn construction_panicked(&self, context: &Context, name: &str, message: &str) {
        for observer in &self.observers {
            observer.construction_panicked(context, name, message);
        }
    }
}

/// Built-in observer that logs events to stdout.
///
/// Duplicate registrations, type mismatches and constructor panics go to
/// stderr. Useful during development; production hosts usually forward the
/// events to their own logging instead.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{FactoryRegistry, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut builder = FactoryRegistry::builder();
/// builder.add_observer(Arc::new(LoggingObserver::with_prefix("[audio]")));
/// let registry = builder.build();
/// # let _ = registry;
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-factory]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for LoggingObserver {
    fn extension_registered(&self, context: &Context, name: &str, mode: ExtensionMode) {
        println!("{} [{}] Extension registered: {} ({})", self.prefix, context, name, mode);
    }

    fn duplicate_extension(&self, context: &Context, name: &str, kept: ExtensionMode, rejected: ExtensionMode) {
        eprintln!(
            "{} [{}] Duplicate extension ignored: {} (kept {}, rejected {})",
            self.prefix, context, name, kept, rejected
        );
    }

    fn extension_applied(&self, context: &Context, name: &str, mode: ExtensionMode) {
        println!("{} [{}] Extension applied: {} ({})", self.prefix, context, name, mode);
    }

    fn extension_type_mismatch(&self, context: &Context, name: &str, registered: &'static str, requested: &'static str) {
        eprintln!(
            "{} [{}] Extension for {} skipped: registered for {}, requested {}",
            self.prefix, context, name, registered, requested
        );
    }

    fn instance_created(&self, context: &Context, name: &str, duration: Duration) {
        println!("{} [{}] Created: {} in {:?}", self.prefix, context, name, duration);
    }

    fn singleton_cached(&self, context: &Context, name: &str) {
        println!("{} [{}] Singleton cached: {}", self.prefix, context, name);
    }

    fn singleton_reused(&self, context: &Context, name: &str) {
        println!("{} [{}] Singleton reused: {}", self.prefix, context, name);
    }

    fn singleton_type_mismatch(&self, context: &Context, name: &str, cached: &'static str, requested: &'static str) {
        eprintln!(
            "{} [{}] Singleton {} holds {}, requested {}",
            self.prefix, context, name, cached, requested
        );
    }

    fn singleton_replaced(&self, context: &Context, name: &str) {
        println!("{} [{}] Singleton replaced: {}", self.prefix, context, name);
    }

    fn construction_panicked(&self, context: &Context, name: &str, message: &str) {
        eprintln!("{} [{}] CONSTRUCTOR PANIC in {}: {}", self.prefix, context, name, message);
    }
}
