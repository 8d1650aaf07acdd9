//! Context tokens scoping extensions and singletons.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

struct ContextInner {
    id: u64,
    label: Option<String>,
}

/// Opaque scoping token for extensions and singleton instances.
///
/// Two contexts are equal only when one is a clone of the other. Labels are
/// diagnostic and never take part in equality, so two contexts created with
/// the same label stay isolated from each other.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::Context;
///
/// let a = Context::labeled("player-1");
/// let b = Context::labeled("player-1");
///
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// assert_eq!(a.label(), Some("player-1"));
/// ```
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Creates a fresh, empty context.
    pub fn new() -> Self {
        Self::with_label(None)
    }

    /// Creates a fresh context carrying a diagnostic label.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self::with_label(Some(label.into()))
    }

    fn with_label(label: Option<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
                label,
            }),
        }
    }

    /// Process-unique identifier of this context.
    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Diagnostic label, if one was given.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Context {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .finish()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.label {
            Some(label) => write!(f, "{}#{}", label, self.inner.id),
            None => write!(f, "context#{}", self.inner.id),
        }
    }
}
