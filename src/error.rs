//! Error types for the factory registry.
//!
//! The core registry operations never fail: missing extensions, missing
//! singletons and duplicate registrations all fall back to a default. These
//! errors are only produced by the strict helpers layered on top of that
//! default path and by option parsing.

use std::fmt;

/// Factory registry errors
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{Context, FactoryError, FactoryRegistry};
///
/// let registry = FactoryRegistry::new();
/// let ctx = Context::new();
///
/// match registry.require_singleton_instance::<String>(&ctx, "Settings") {
///     Err(FactoryError::NotFound(name)) => assert_eq!(name, "Settings"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// No singleton cached under the component name
    NotFound(String),
    /// Cached singleton or extension has a different concrete type
    TypeMismatch(&'static str),
    /// Registry options could not be parsed
    Config(String),
    /// A registry snapshot could not be serialized
    Serialization(String),
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryError::NotFound(name) => write!(f, "Singleton not found: {}", name),
            FactoryError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            FactoryError::Config(msg) => write!(f, "Invalid registry options: {}", msg),
            FactoryError::Serialization(msg) => write!(f, "Snapshot serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for FactoryError {}

/// Result type for strict registry operations
pub type FactoryResult<T> = Result<T, FactoryError>;
