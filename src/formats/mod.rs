//! Format plugins shipped with the crate.
//!
//! - [`text`] - flat `;`-separated text lists (`.chl`), rewritten in place
//! - [`package`] - zip archive of JSON lists (`.chz`), staged and repackaged
//!
//! Vendor formats live in their own crates and implement the same
//! [`ChannelSerializer`](crate::serializer::ChannelSerializer) contract.

pub mod package;
pub mod text;

pub use package::{PackageListPlugin, PackageListSerializer, PackageManifest};
pub use text::{TextListPlugin, TextListSerializer};

use crate::serializer::PluginRegistry;

impl PluginRegistry {
    /// Registry with the plugins shipped in this crate.
    pub fn with_builtin_plugins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TextListPlugin));
        registry.register(Box::new(PackageListPlugin));
        registry
    }
}
