//! # chanlist-base
//!
//! Serializer contract and shared plumbing for TV channel-list format plugins.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! formats     → Bundled plugins (text lists, zip packages)
//!   ↓
//! serializer  → ChannelSerializer contract, SupportedFeatures, archive staging,
//!   ↓           diagnostics report, plugin registry
//! model       → DataRoot, ChannelList, ChannelInfo
//!   ↓
//! base        → Tolerant numeric parsing, default text encoding
//! ```

// ============================================================================
// MODULES (dependency order: base → model → serializer → formats)
// ============================================================================

/// Foundation helpers: numeric parsing, text encoding
pub mod base;

/// Channel domain model slice: data root, lists, channels
pub mod model;

/// Serializer contract: lifecycle, capabilities, staging, reporting
pub mod serializer;

/// Bundled format plugins
pub mod formats;

// Re-export the types every plugin and host touches
pub use base::{TextEncoding, parse_decimal, parse_int, parse_long};
pub use model::{ChannelInfo, ChannelList, DataRoot};
pub use serializer::{
    ChannelSerializer, PluginRegistry, SerializerBase, SerializerError, SerializerOptions,
    SerializerPlugin, SupportedFeatures,
};
