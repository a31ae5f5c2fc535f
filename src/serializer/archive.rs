//! Staging of zip-packaged channel lists.
//!
//! Some devices export their channel list as a ZIP archive of XML or binary
//! files. A plugin extracts the archive into a private temp directory, edits
//! the files in place, and zips the directory back up on save.
//!
//! ```text
//! stage(source.zip) ──► <temp>/chanlist-XXXXXX/...   (one per plugin instance)
//!                              │ edit files
//! package(dest.zip) ◄──────────┘  (temp file beside dest, then rename)
//! release()         ──► directory removed, errors swallowed
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile, TempDir};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::{Result, SerializerError};

/// Prefix of every staging directory name.
pub const STAGING_PREFIX: &str = "chanlist-";

/// Deflate level used when `compress` is requested (size-optimized).
const MAX_DEFLATE_LEVEL: i64 = 9;

/// The temp directory an archive-based plugin works in.
///
/// At most one directory exists per instance. Re-staging removes the previous
/// one first, and dropping the value removes it as well.
#[derive(Debug, Default)]
pub struct StagedArchive {
    temp_root: Option<PathBuf>,
    dir: Option<TempDir>,
}

impl StagedArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create staging directories below `root` instead of the system temp dir.
    pub fn with_temp_root(root: Option<PathBuf>) -> Self {
        Self {
            temp_root: root,
            dir: None,
        }
    }

    /// The current staging directory, if any.
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    pub fn is_staged(&self) -> bool {
        self.dir.is_some()
    }

    /// Extract `source` into a fresh staging directory.
    ///
    /// A previously staged directory is removed first. If extraction fails
    /// the new directory stays owned by `self` and goes away on
    /// [`release`](Self::release).
    pub fn stage(&mut self, source: &Path) -> Result<&Path> {
        self.release();

        let mut builder = Builder::new();
        builder.prefix(STAGING_PREFIX);
        let dir = match self.temp_root.as_deref() {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        let dir = self.dir.insert(dir);
        tracing::debug!(
            source = %source.display(),
            staged = %dir.path().display(),
            "staging archive"
        );

        let file = File::open(source)?;
        let mut archive = ZipArchive::new(file)?;
        archive.extract(dir.path())?;
        Ok(dir.path())
    }

    /// Zip the whole staging directory into `destination`.
    ///
    /// The archive is written to a temp file next to `destination` and renamed
    /// over it only once complete, so a failure leaves the old file intact.
    /// Entries are added in file-name order so output is reproducible.
    pub fn package(&self, destination: &Path, compress: bool) -> Result<()> {
        let dir = self
            .path()
            .ok_or_else(|| SerializerError::archive("no staged directory to package"))?;

        let options = if compress {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(MAX_DEFLATE_LEVEL))
        } else {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        };

        let mut zip = ZipWriter::new(temp_file_beside(destination)?);
        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let rel = entry
                .path()
                .strip_prefix(dir)
                .map_err(|e| SerializerError::archive(e.to_string()))?;
            let name = rel.to_string_lossy().replace('\\', "/");
            if entry.file_type().is_dir() {
                zip.add_directory(name, options)?;
            } else {
                zip.start_file(name, options)?;
                let mut file = File::open(entry.path())?;
                io::copy(&mut file, &mut zip)?;
            }
        }
        let tmp = zip.finish()?;
        tmp.persist(destination).map_err(|e| e.error)?;

        tracing::debug!(
            destination = %destination.display(),
            compress,
            "packaged staged archive"
        );
        Ok(())
    }

    /// Remove the staging directory. Never fails; a directory that cannot be
    /// removed (e.g. locked by another process) is left behind.
    pub fn release(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => tracing::debug!(staged = %path.display(), "released staged archive"),
            Err(e) => tracing::debug!(
                staged = %path.display(),
                error = %e,
                "could not remove staged archive directory"
            ),
        }
    }
}

impl Drop for StagedArchive {
    fn drop(&mut self) {
        if self.dir.is_none() {
            return;
        }
        if cfg!(debug_assertions) {
            tracing::warn!(
                staged = ?self.path(),
                "staged archive dropped without dispose(); releasing it now"
            );
        }
        self.release();
    }
}

/// Replace `path` with `contents` via a temp file and rename, so readers see
/// either the old or the new file, never a partial write.
pub fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = temp_file_beside(path)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn temp_file_beside(path: &Path) -> io::Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Builder::new().prefix(".chanlist-").suffix(".tmp").tempfile_in(parent)
}
