//! # ferrous-factory
//!
//! Context-scoped component factories with singleton caching and runtime
//! extension overrides.
//!
//! ## Features
//!
//! - **Class factories**: a fresh, independently owned instance per call
//! - **Singleton factories**: one cached `Arc` per (context, component name)
//! - **Extensions**: replace a component entirely, or override selected
//!   members while keeping the rest of the base implementation
//! - **Context isolation**: extensions and singletons never leak between contexts
//! - **Quiet defaults**: nothing is "not found" or "already registered"; observers
//!   report those events instead of errors
//! - **Thread-safe**: one lock guards all registry state, constructors run outside it
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_factory::{Component, Constructor, Context, Extension, FactoryRegistry};
//! use std::sync::Arc;
//!
//! type Greet = Arc<dyn Fn() -> String + Send + Sync>;
//!
//! struct Greeter {
//!     greet: Greet,
//!     wave: Greet,
//! }
//!
//! #[derive(Default)]
//! struct GreeterOverrides {
//!     greet: Option<Greet>,
//!     wave: Option<Greet>,
//! }
//!
//! impl Component for Greeter {
//!     type Overrides = GreeterOverrides;
//!
//!     fn apply_overrides(&mut self, overrides: GreeterOverrides) {
//!         if let Some(greet) = overrides.greet {
//!             self.greet = greet;
//!         }
//!         if let Some(wave) = overrides.wave {
//!             self.wave = wave;
//!         }
//!     }
//! }
//!
//! let registry = FactoryRegistry::new();
//! let greeter = Constructor::of(|_env, ()| Greeter {
//!     greet: Arc::new(|| "hi".to_string()),
//!     wave: Arc::new(|| "o/".to_string()),
//! });
//!
//! let ctx_a = Context::labeled("a");
//! let ctx_b = Context::labeled("b");
//!
//! // Override `greet` in context A only
//! registry.extend(
//!     "Greeter",
//!     Extension::<Greeter>::override_with(|_env| GreeterOverrides {
//!         greet: Some(Arc::new(|| "hello".to_string())),
//!         ..Default::default()
//!     }),
//!     &ctx_a,
//! );
//!
//! let in_a = registry.class_factory(&greeter).bind(&ctx_a).create(());
//! assert_eq!((in_a.greet)(), "hello");
//! assert_eq!((in_a.wave)(), "o/");
//!
//! let in_b = registry.class_factory(&greeter).bind(&ctx_b).create(());
//! assert_eq!((in_b.greet)(), "hi");
//! ```
//!
//! ## Singletons
//!
//! ```rust
//! use ferrous_factory::{Component, Constructor, Context, FactoryRegistry};
//! use std::sync::Arc;
//!
//! struct Settings { volume: u8 }
//!
//! impl Component for Settings {
//!     type Overrides = ();
//!     fn apply_overrides(&mut self, _: ()) {}
//! }
//!
//! let registry = FactoryRegistry::new();
//! let ctx = Context::new();
//! let settings = Constructor::of(|_env, ()| Settings { volume: 7 });
//!
//! let first = registry.singleton_factory(&settings).bind(&ctx).get_instance(());
//! let second = registry.singleton_factory(&settings).bind(&ctx).get_instance(());
//! assert!(Arc::ptr_eq(&first, &second));
//!
//! // Other contexts get their own instance
//! let other = registry.singleton_factory(&settings).bind(&Context::new()).get_instance(());
//! assert!(!Arc::ptr_eq(&first, &other));
//! ```

// Module declarations
pub mod component;
pub mod config;
pub mod context;
pub mod descriptors;
pub mod error;
pub mod extension;
pub mod factory;
pub mod observer;
pub mod registry;

#[cfg(feature = "snapshot")]
pub mod snapshot;

// Internal modules
mod internal;
mod singleton;

// Re-export core types
pub use component::{Component, ConstructionEnv, Constructor, ExtensionEnv};
pub use config::RegistryOptions;
pub use context::Context;
pub use descriptors::ExtensionInfo;
pub use error::{FactoryError, FactoryResult};
pub use extension::{Extension, ExtensionMode};
pub use factory::{ClassFactory, SingletonFactory, UnboundClassFactory, UnboundSingletonFactory};
pub use observer::{LoggingObserver, RegistryObserver};
pub use registry::{FactoryRegistry, RegistryBuilder};

#[cfg(feature = "snapshot")]
pub use snapshot::{ContextSnapshot, RegistrySnapshot};
