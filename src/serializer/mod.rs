//! The serializer contract shared by all channel-list format plugins.
//!
//! - [`ChannelSerializer`] / [`SerializerBase`] - load/save/dispose lifecycle
//! - [`SupportedFeatures`] - what a format lets the user edit
//! - [`StagedArchive`] - temp extraction directory for zip-packaged formats
//! - [`report`] - diagnostics text for support requests
//! - [`PluginRegistry`] - picks the plugin for a file
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  flat binary │   │ XML-in-zip   │   │ text export  │   format plugins
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        ▼                  ▼                  ▼
//! ┌──────────────────────────────────────────────────────┐
//! │ ChannelSerializer: load / save / data_file_paths /   │
//! │   file_information / clean_up_channel_data / dispose │
//! ├──────────────────────────────────────────────────────┤
//! │ SerializerBase: paths, encoding, SupportedFeatures,  │
//! │   StagedArchive, DataRoot                            │
//! └──────────────────────────────────────────────────────┘
//! ```

mod archive;
mod contract;
mod error;
mod features;
mod options;
mod plugin;
pub mod report;

pub use archive::{STAGING_PREFIX, StagedArchive, write_file_atomic};
pub use contract::{ChannelSerializer, HostWindowHandle, SerializerBase};
pub use error::{Result, SerializerError};
pub use features::{
    ChannelNameEditMode, DEFAULT_MAX_FAVORITE_LISTS, DeletionMode, FavoritesMode,
    FavoritesPolicy, MAX_FAVORITE_LISTS_LIMIT, SupportedFeatures,
};
pub use options::SerializerOptions;
pub use plugin::{PluginRegistry, SerializerPlugin};
