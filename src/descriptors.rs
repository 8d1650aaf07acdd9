//! Extension descriptors for introspection and diagnostics.

use crate::extension::{ExtensionDescriptor, ExtensionMode};

/// Public view of a registered extension.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{Component, Context, Extension, ExtensionMode, FactoryRegistry};
///
/// struct Decoder { strict: bool }
///
/// impl Component for Decoder {
///     type Overrides = bool;
///     fn apply_overrides(&mut self, strict: bool) {
///         self.strict = strict;
///     }
/// }
///
/// let registry = FactoryRegistry::new();
/// let ctx = Context::new();
/// registry.extend("Decoder", Extension::<Decoder>::override_with(|_| true), &ctx);
///
/// let infos = registry.extensions(&ctx);
/// assert_eq!(infos.len(), 1);
/// assert_eq!(infos[0].name, "Decoder");
/// assert_eq!(infos[0].mode, ExtensionMode::Override);
/// assert!(infos[0].component_type.ends_with("Decoder"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtensionInfo {
    /// Component name the extension is registered under
    pub name: String,
    /// Merge strategy
    pub mode: ExtensionMode,
    /// Full type name of the component the extension produces
    pub component_type: String,
}

impl ExtensionInfo {
    pub(crate) fn from_descriptor(descriptor: &ExtensionDescriptor) -> Self {
        Self {
            name: descriptor.name.to_string(),
            mode: descriptor.mode,
            component_type: descriptor.component_type.to_string(),
        }
    }

    pub fn is_override(&self) -> bool {
        self.mode.is_override()
    }
}
