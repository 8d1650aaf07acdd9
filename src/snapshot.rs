//! Serializable registry dumps for debugging.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::descriptors::ExtensionInfo;
use crate::error::{FactoryError, FactoryResult};
use crate::registry::FactoryRegistry;

/// Point-in-time view of everything a registry holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub label: Option<String>,
    /// RFC 3339 capture time
    pub captured_at: String,
    /// Contexts ordered by id
    pub contexts: Vec<ContextSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub id: u64,
    pub label: Option<String>,
    /// Extensions sorted by name
    pub extensions: Vec<ExtensionInfo>,
    /// Cached singleton names in insertion order
    pub singletons: Vec<String>,
}

impl RegistrySnapshot {
    pub fn to_json(&self) -> FactoryResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FactoryError::Serialization(e.to_string()))
    }

    /// Finds the entry for `context`, if the registry knew about it.
    pub fn context(&self, context: &Context) -> Option<&ContextSnapshot> {
        self.contexts.iter().find(|c| c.id == context.id())
    }
}

impl FactoryRegistry {
    /// Captures the extension table and singleton cache.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_factory::{Context, FactoryRegistry};
    /// use std::sync::Arc;
    ///
    /// let registry = FactoryRegistry::new();
    /// let ctx = Context::labeled("session");
    /// registry.set_singleton_instance(&ctx, "Settings", Arc::new(42u32));
    ///
    /// let snapshot = registry.snapshot();
    /// let session = snapshot.context(&ctx).unwrap();
    /// assert_eq!(session.label.as_deref(), Some("session"));
    /// assert_eq!(session.singletons, vec!["Settings".to_string()]);
    /// assert!(snapshot.to_json().unwrap().contains("Settings"));
    /// ```
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut contexts: Vec<ContextSnapshot> = self.with_state(|state| {
            let mut contexts: Vec<ContextSnapshot> = state
                .extensions
                .records()
                .map(|(context, record)| {
                    let mut extensions: Vec<ExtensionInfo> =
                        record.iter().map(ExtensionInfo::from_descriptor).collect();
                    extensions.sort_by(|a, b| a.name.cmp(&b.name));
                    ContextSnapshot {
                        id: context.id(),
                        label: context.label().map(str::to_string),
                        extensions,
                        singletons: Vec::new(),
                    }
                })
                .collect();

            for entry in state.singletons.iter() {
                let id = entry.context.id();
                match contexts.iter_mut().find(|c| c.id == id) {
                    Some(existing) => existing.singletons.push(entry.name.to_string()),
                    None => contexts.push(ContextSnapshot {
                        id,
                        label: entry.context.label().map(str::to_string),
                        extensions: Vec::new(),
                        singletons: vec![entry.name.to_string()],
                    }),
                }
            }
            contexts
        });
        contexts.sort_by_key(|c| c.id);

        RegistrySnapshot {
            label: self.options().label.clone(),
            captured_at: chrono::Utc::now().to_rfc3339(),
            contexts,
        }
    }
}
