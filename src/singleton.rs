//! Shared singleton cache keyed by (context, component name).

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::context::Context;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Cached instance together with the name of its concrete type.
#[derive(Clone)]
pub(crate) struct Stored {
    pub(crate) instance: AnyArc,
    pub(crate) type_name: &'static str,
}

impl Stored {
    pub(crate) fn new<T: Any + Send + Sync>(instance: Arc<T>) -> Self {
        Self {
            instance,
            type_name: type_name::<T>(),
        }
    }

    /// Recovers the typed instance, or the stored type name on mismatch.
    pub(crate) fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>, &'static str> {
        let type_name = self.type_name;
        self.instance.downcast::<T>().map_err(|_| type_name)
    }
}

pub(crate) struct SingletonEntry {
    pub(crate) context: Context,
    pub(crate) name: Arc<str>,
    pub(crate) stored: Stored,
}

/// Outcome of [`SingletonCache::find_or_insert`].
pub(crate) enum Cached {
    /// The offered instance was stored
    Inserted,
    /// An entry already existed; the offered instance was discarded
    Existing(Stored),
}

/// Append-only list of singleton entries, at most one per (context, name).
///
/// Entries are few per process and looked up by linear scan, the same
/// cache-friendly small-collection path the container registry uses.
#[derive(Default)]
pub(crate) struct SingletonCache {
    entries: Vec<SingletonEntry>,
}

impl SingletonCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn position(&self, context: &Context, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.context == *context && &*entry.name == name)
    }

    pub(crate) fn get(&self, context: &Context, name: &str) -> Option<Stored> {
        self.position(context, name)
            .map(|pos| self.entries[pos].stored.clone())
    }

    /// Overwrites the entry in place or appends a new one.
    ///
    /// Returns `true` when an existing entry was overwritten.
    pub(crate) fn set(&mut self, context: &Context, name: &str, stored: Stored) -> bool {
        match self.position(context, name) {
            Some(pos) => {
                self.entries[pos].stored = stored;
                true
            }
            None => {
                self.push(context, name, stored);
                false
            }
        }
    }

    /// Stores `stored` only if no entry exists for (context, name).
    pub(crate) fn find_or_insert(&mut self, context: &Context, name: &str, stored: Stored) -> Cached {
        match self.position(context, name) {
            Some(pos) => Cached::Existing(self.entries[pos].stored.clone()),
            None => {
                self.push(context, name, stored);
                Cached::Inserted
            }
        }
    }

    fn push(&mut self, context: &Context, name: &str, stored: Stored) {
        self.entries.push(SingletonEntry {
            context: context.clone(),
            name: Arc::from(name),
            stored,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &SingletonEntry> {
        self.entries.iter()
    }
}
