//! # Plugins
//!
//! Converters that rewrite nodes after parsing and take over their
//! serialization.
//!
//! ## Modules
//!
//! - **`descriptor`**: `PluginDescriptor`, `ParseConverter`, `SerializeConverter`, `Selector`
//! - **`registry`**: `PluginRegistry`, the ordered immutable converter set
//! - **`builtin`**: video, attachment and math-fence converters
//! - **`callout`**: the bundled `warning` callout plugin
//!
//! ## Key Invariants
//!
//! - Host plugins are consulted before built-ins; the first match wins
//! - Converters report failure as `ConvertError`, never by panicking
//! - A registry is `Send + Sync` and shared by cloning

pub mod builtin;
pub mod callout;
pub mod descriptor;
pub mod registry;

pub use descriptor::{
    ConvertError, ParseConverter, PluginDescriptor, Selector, SerializeConverter,
};
pub use registry::PluginRegistry;

/// Plugins shipped with the engine, by configuration name.
pub fn bundled(name: &str) -> Option<PluginDescriptor> {
    match name {
        callout::NAME => Some(callout::warning()),
        _ => None,
    }
}

/// Names accepted by [`bundled`].
pub const BUNDLED: [&str; 1] = [callout::NAME];
