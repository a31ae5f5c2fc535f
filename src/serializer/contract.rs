//! The lifecycle every format plugin implements.
//!
//! ## Design
//!
//! State shared by all plugins (paths, encoding, capability set, staged
//! archive, loaded data) lives in [`SerializerBase`]. A plugin embeds one and
//! implements [`ChannelSerializer`]: `load`/`save` are required, everything
//! else has a default that delegates to a `SerializerBase` helper, so a
//! plugin overrides only what its format does differently.
//!
//! ```text
//! host: registry.open(path) ─► load() ─► edit data_root_mut() ─► save() ─► dispose()
//! ```
//!
//! Dropping a serializer releases its staged archive as well; `dispose()`
//! makes that explicit and is what hosts should call.

use std::path::{Path, PathBuf};

use super::archive::StagedArchive;
use super::error::{Result, SerializerError};
use super::features::SupportedFeatures;
use super::options::SerializerOptions;
use super::report;
use crate::base::TextEncoding;
use crate::model::DataRoot;

/// Opaque handle of the host's main window, passed to device-settings hooks.
///
/// Plugins must work headless; the value is never dereferenced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HostWindowHandle(pub usize);

/// State owned by every plugin instance.
#[derive(Debug)]
pub struct SerializerBase {
    file_name: PathBuf,
    save_as_file_name: Option<PathBuf>,
    default_encoding: TextEncoding,
    features: SupportedFeatures,
    archive: StagedArchive,
    data_root: DataRoot,
    compress_archives: bool,
}

impl SerializerBase {
    /// Create the shared state for a plugin reading `file_name`.
    ///
    /// `features` must be fully configured; the host only gets read access.
    pub fn new(
        file_name: impl Into<PathBuf>,
        features: SupportedFeatures,
        options: &SerializerOptions,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            save_as_file_name: None,
            default_encoding: options.default_encoding,
            features,
            archive: StagedArchive::with_temp_root(options.temp_root.clone()),
            data_root: DataRoot::new(),
            compress_archives: options.compress_archives,
        }
    }

    // ── Paths ────────────────────────────────────────────────────────

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn save_as_file_name(&self) -> Option<&Path> {
        self.save_as_file_name.as_deref()
    }

    /// Write the next `save()` to `path` instead of the input file.
    pub fn set_save_as_file_name(&mut self, path: Option<PathBuf>) {
        self.save_as_file_name = path;
    }

    /// Where `save()` must write.
    ///
    /// A save-as path naming a different file is rejected when the format
    /// cannot save to a new file.
    pub fn output_path(&self) -> Result<&Path> {
        match self.save_as_file_name.as_deref() {
            None => Ok(&self.file_name),
            Some(target) if target == self.file_name => Ok(&self.file_name),
            Some(target) if self.features.can_save_as_new_file => Ok(target),
            Some(target) => Err(SerializerError::SaveAsNotSupported(target.to_path_buf())),
        }
    }

    /// Backup set of a single-file format: just the input file.
    pub fn default_data_file_paths(&self) -> Vec<PathBuf> {
        vec![self.file_name.clone()]
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Code page for formats whose files carry no encoding marker. Formats
    /// with a fixed encoding, like the bundled UTF-8 text lists, ignore it.
    pub fn default_encoding(&self) -> TextEncoding {
        self.default_encoding
    }

    pub fn set_default_encoding(&mut self, encoding: TextEncoding) {
        self.default_encoding = encoding;
    }

    pub fn features(&self) -> &SupportedFeatures {
        &self.features
    }

    /// Whether packaged archives should be deflated on save.
    pub fn compress_archives(&self) -> bool {
        self.compress_archives
    }

    // ── Data ─────────────────────────────────────────────────────────

    pub fn data_root(&self) -> &DataRoot {
        &self.data_root
    }

    pub fn data_root_mut(&mut self) -> &mut DataRoot {
        &mut self.data_root
    }

    /// Swap in freshly loaded data, returning the previous root.
    pub fn replace_data_root(&mut self, data_root: DataRoot) -> DataRoot {
        std::mem::replace(&mut self.data_root, data_root)
    }

    pub fn file_information(&self) -> String {
        report::file_information(&self.file_name, &self.data_root)
    }

    // ── Archive staging ──────────────────────────────────────────────

    /// Extract the input file into a fresh staging directory.
    pub fn stage_archive(&mut self) -> Result<&Path> {
        self.archive.stage(&self.file_name)
    }

    pub fn archive(&self) -> &StagedArchive {
        &self.archive
    }

    pub fn staged_dir(&self) -> Option<&Path> {
        self.archive.path()
    }

    /// Zip the staging directory into `destination`.
    pub fn package_archive(&self, destination: &Path, compress: bool) -> Result<()> {
        self.archive.package(destination, compress)
    }

    /// Release the staging directory. Safe to call any number of times.
    pub fn dispose(&mut self) {
        self.archive.release();
    }
}

/// A channel-list format plugin.
pub trait ChannelSerializer {
    /// Shared state.
    fn base(&self) -> &SerializerBase;

    /// Shared state (mutable).
    fn base_mut(&mut self) -> &mut SerializerBase;

    /// Display name and version of the detected format, e.g. `"Text list v1"`.
    fn format_description(&self) -> String;

    /// Read the input file into the data root.
    ///
    /// Returns [`SerializerError::Format`] when the file is not this format
    /// and [`SerializerError::UnsupportedVersion`] when it is, but in a
    /// version the plugin does not handle.
    fn load(&mut self) -> Result<()>;

    /// Write the data root to [`SerializerBase::output_path`].
    ///
    /// Implementations must replace the target only after the new content is
    /// completely written.
    fn save(&mut self) -> Result<()>;

    /// Files to copy together when backing up or restoring this list. The
    /// first entry is always the primary file.
    fn data_file_paths(&self) -> Vec<PathBuf> {
        self.base().default_data_file_paths()
    }

    fn file_information(&self) -> String {
        self.base().file_information()
    }

    /// Format-specific normalization. Returns a description of what changed,
    /// or `None` when nothing was done.
    fn clean_up_channel_data(&mut self) -> Option<String> {
        None
    }

    fn show_device_settings_ui(&mut self, _owner: HostWindowHandle) {}

    fn dispose(&mut self) {
        self.base_mut().dispose();
    }

    // ── Convenience accessors ────────────────────────────────────────

    fn file_name(&self) -> &Path {
        self.base().file_name()
    }

    fn features(&self) -> &SupportedFeatures {
        self.base().features()
    }

    fn data_root(&self) -> &DataRoot {
        self.base().data_root()
    }

    fn data_root_mut(&mut self) -> &mut DataRoot {
        self.base_mut().data_root_mut()
    }

    fn set_save_as_file_name(&mut self, path: Option<PathBuf>) {
        self.base_mut().set_save_as_file_name(path);
    }
}
