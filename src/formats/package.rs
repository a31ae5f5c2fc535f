//! Zip-packaged channel lists (`.chz`).
//!
//! ## Package Structure
//!
//! ```text
//! lists.chz (ZIP archive)
//! ├── manifest.json          # {"format": "chanlist-package", "version": 1, "lists": [...]}
//! ├── lists/
//! │   ├── 00.json            # one ChannelList per file, in manifest order
//! │   └── 01.json
//! └── ...                    # other members are carried over untouched
//! ```
//!
//! The archive is staged on load and repackaged from the staging directory on
//! save, so members this plugin does not understand survive a round trip.

use std::fmt::Write as _;
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{ChannelList, DataRoot};
use crate::serializer::{
    ChannelNameEditMode, ChannelSerializer, DeletionMode, FavoritesMode, Result, SerializerBase,
    SerializerError, SerializerOptions, SerializerPlugin, SupportedFeatures,
};

/// Standard paths within a package.
pub mod paths {
    /// Manifest file location.
    pub const MANIFEST: &str = "manifest.json";
    /// List directory.
    pub const LISTS_DIR: &str = "lists";
}

/// Value of the manifest's `format` key.
pub const FORMAT_ID: &str = "chanlist-package";
const SUPPORTED_VERSION: u32 = 1;

/// Package manifest (`manifest.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub format: String,
    pub version: u32,
    /// Archive-relative paths of the list files, in list order.
    #[serde(default)]
    pub lists: Vec<String>,
    /// Keys written by other tools, preserved on save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Factory for [`PackageListSerializer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageListPlugin;

impl SerializerPlugin for PackageListPlugin {
    fn plugin_name(&self) -> &'static str {
        "Channel list package"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["chz", "zip"]
    }

    fn create_serializer(
        &self,
        path: &Path,
        options: &SerializerOptions,
    ) -> Box<dyn ChannelSerializer> {
        Box::new(PackageListSerializer::new(path, options))
    }
}

/// Reads and writes zip-packaged JSON channel lists.
#[derive(Debug)]
pub struct PackageListSerializer {
    base: SerializerBase,
    manifest: Option<PackageManifest>,
}

impl PackageListSerializer {
    pub fn new(path: &Path, options: &SerializerOptions) -> Self {
        let mut features = SupportedFeatures::default()
            .with_channel_name_edit(ChannelNameEditMode::ALL)
            .with_deletion_mode(DeletionMode::PhysicallyRemoved)
            .with_favorites(FavoritesMode::OrderedPerSource, 8)
            .with_save_as(true)
            .with_clean_up(true)
            .with_tv_radio_data_ordering(true);
        features.allows_short_name_editing = true;
        features.can_rename_favorite_lists = true;
        Self {
            base: SerializerBase::new(path, features, options),
            manifest: None,
        }
    }

    pub fn manifest(&self) -> Option<&PackageManifest> {
        self.manifest.as_ref()
    }

    fn staged_dir(&self) -> Result<PathBuf> {
        self.base
            .staged_dir()
            .map(Path::to_path_buf)
            .ok_or_else(|| SerializerError::archive("package is not loaded"))
    }
}

impl ChannelSerializer for PackageListSerializer {
    fn base(&self) -> &SerializerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SerializerBase {
        &mut self.base
    }

    fn format_description(&self) -> String {
        match &self.manifest {
            Some(m) => format!("Channel list package v{}", m.version),
            None => "Channel list package".to_string(),
        }
    }

    fn load(&mut self) -> Result<()> {
        validate_zip_magic(self.base.file_name())?;
        let dir = self.base.stage_archive()?.to_path_buf();

        let manifest_path = dir.join(paths::MANIFEST);
        if !manifest_path.is_file() {
            return Err(SerializerError::format(
                self.base.file_name(),
                "zip archive without manifest.json",
            ));
        }
        let manifest: PackageManifest = serde_json::from_slice(&fs::read(&manifest_path)?)
            .map_err(|e| SerializerError::format(self.base.file_name(), e.to_string()))?;
        if manifest.format != FORMAT_ID {
            return Err(SerializerError::format(
                self.base.file_name(),
                format!("manifest format is {:?}", manifest.format),
            ));
        }
        if manifest.version != SUPPORTED_VERSION {
            return Err(SerializerError::UnsupportedVersion(format!(
                "{FORMAT_ID} v{}",
                manifest.version
            )));
        }

        if let Some(bad) = manifest.lists.iter().find(|rel| !is_archive_member(rel)) {
            return Err(SerializerError::format(
                self.base.file_name(),
                format!("manifest list path {bad:?} points outside the archive"),
            ));
        }

        let mut root = DataRoot::new();
        for rel in &manifest.lists {
            let list: ChannelList = serde_json::from_slice(&fs::read(dir.join(rel))?)?;
            root.add_channel_list(list);
        }
        tracing::debug!(
            path = %self.base.file_name().display(),
            lists = root.channel_lists().len(),
            "loaded channel list package"
        );
        self.base.replace_data_root(root);
        self.manifest = Some(manifest);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let target = self.base.output_path()?.to_path_buf();
        let dir = self.staged_dir()?;
        let lists_dir = dir.join(paths::LISTS_DIR);

        // Stale list files would otherwise be packaged again.
        if let Some(old) = &self.manifest {
            for rel in old.lists.iter().filter(|rel| is_archive_member(rel)) {
                let path = dir.join(rel);
                if path.is_file() {
                    fs::remove_file(path)?;
                }
            }
        }
        fs::create_dir_all(&lists_dir)?;

        let mut rels = Vec::new();
        for (index, list) in self.base.data_root().channel_lists().iter().enumerate() {
            let rel = format!("{}/{index:02}.json", paths::LISTS_DIR);
            fs::write(dir.join(&rel), serde_json::to_vec_pretty(list)?)?;
            rels.push(rel);
        }

        let mut manifest = self.manifest.clone().unwrap_or_else(|| PackageManifest {
            format: FORMAT_ID.to_string(),
            version: SUPPORTED_VERSION,
            lists: Vec::new(),
            extra: serde_json::Map::new(),
        });
        manifest.lists = rels;
        fs::write(dir.join(paths::MANIFEST), serde_json::to_vec_pretty(&manifest)?)?;

        self.base
            .package_archive(&target, self.base.compress_archives())?;
        self.manifest = Some(manifest);
        Ok(())
    }

    /// Removes channels flagged as deleted (this format drops them physically)
    /// and restores the TV, radio, data grouping the device expects.
    fn clean_up_channel_data(&mut self) -> Option<String> {
        let mut log = String::new();
        for list in self.base.data_root_mut().channel_lists_mut() {
            let before = list.len();
            list.channels.retain(|ch| !ch.is_deleted);
            let removed = before - list.len();
            if removed > 0 {
                writeln!(
                    log,
                    "{}: removed {removed} deleted channel(s)",
                    list.short_caption
                )
                .ok();
            }
            if !list.is_grouped_by_service_type() {
                list.channels
                    .sort_by_key(|ch| ch.service_type.group_rank());
                writeln!(
                    log,
                    "{}: reordered channels to TV, radio, data",
                    list.short_caption
                )
                .ok();
            }
        }
        (!log.is_empty()).then_some(log)
    }
}

/// A relative path made only of plain names, so joining it onto the staging
/// directory cannot leave it.
fn is_archive_member(rel: &str) -> bool {
    let path = Path::new(rel);
    !rel.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Quick check for the ZIP local-file-header magic.
fn validate_zip_magic(path: &Path) -> Result<()> {
    let mut magic = [0u8; 4];
    let mut file = fs::File::open(path)?;
    let read = file.read(&mut magic)?;
    if read < magic.len() || &magic != b"PK\x03\x04" {
        return Err(SerializerError::format(path, "not a ZIP archive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::model::{ChannelInfo, ServiceType, SignalSource};
    use rstest::rstest;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn write_package(path: &Path, manifest: &str, lists: &[(&str, &ChannelList)]) {
        let mut zip = ZipWriter::new(fs::File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        zip.start_file(paths::MANIFEST, options).unwrap();
        zip.write_all(manifest.as_bytes()).unwrap();
        for (name, list) in lists {
            zip.start_file(*name, options).unwrap();
            zip.write_all(&serde_json::to_vec(list).unwrap()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn mixed_list() -> ChannelList {
        let mut list = ChannelList::new(SignalSource::DVB_S, "Satellite", "DVB-S");
        list.add_channel(
            ChannelInfo::new("r1", "Radio").with_preset_program_nr(1).with_service_type(ServiceType::Radio),
        );
        let mut gone = ChannelInfo::new("t0", "Gone").with_preset_program_nr(2);
        gone.is_deleted = true;
        list.add_channel(gone);
        list.add_channel(ChannelInfo::new("t1", "TV").with_preset_program_nr(3));
        list
    }

    fn options(work: &TempDir) -> SerializerOptions {
        SerializerOptions::default().with_temp_root(work.path().join("staging"))
    }

    #[test]
    fn test_load_reads_lists_in_manifest_order() {
        let work = TempDir::new().unwrap();
        let path = work.path().join("lists.chz");
        let a = ChannelList::new(SignalSource::DVB_T, "Antenna", "A");
        let b = mixed_list();
        write_package(
            &path,
            r#"{"format":"chanlist-package","version":1,"lists":["lists/b.json","lists/a.json"],"device":"X1"}"#,
            &[("lists/a.json", &a), ("lists/b.json", &b)],
        );

        let mut s = PackageListSerializer::new(&path, &options(&work));
        s.load().unwrap();
        let captions: Vec<_> = s
            .data_root()
            .channel_lists()
            .iter()
            .map(|l| l.short_caption.as_str())
            .collect();
        assert_eq!(captions, vec!["DVB-S", "A"]);
        assert_eq!(s.format_description(), "Channel list package v1");
        assert_eq!(s.manifest().unwrap().extra["device"], "X1");
        s.dispose();
    }

    #[test]
    fn test_non_zip_is_format_error() {
        let work = TempDir::new().unwrap();
        let path = work.path().join("lists.chz");
        fs::write(&path, "#CHANLIST v1\n").unwrap();

        let mut s = PackageListSerializer::new(&path, &options(&work));
        assert!(s.load().unwrap_err().is_format_error());
        assert!(s.base().staged_dir().is_none());
    }

    #[test]
    fn test_foreign_zip_is_format_error() {
        let work = TempDir::new().unwrap();
        let path = work.path().join("other.zip");
        let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
        zip.start_file("data.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<x/>").unwrap();
        zip.finish().unwrap();

        let mut s = PackageListSerializer::new(&path, &options(&work));
        assert!(s.load().unwrap_err().is_format_error());
        s.dispose();
    }

    #[test]
    fn test_newer_version_is_unsupported() {
        let work = TempDir::new().unwrap();
        let path = work.path().join("lists.chz");
        write_package(&path, r#"{"format":"chanlist-package","version":3}"#, &[]);

        let mut s = PackageListSerializer::new(&path, &options(&work));
        let err = s.load().unwrap_err();
        assert_eq!(err.unsupported_version(), Some("chanlist-package v3"));
        s.dispose();
    }

    #[test]
    fn test_clean_up_removes_deleted_and_regroups() {
        let work = TempDir::new().unwrap();
        let path = work.path().join("lists.chz");
        let list = mixed_list();
        write_package(
            &path,
            r#"{"format":"chanlist-package","version":1,"lists":["lists/00.json"]}"#,
            &[("lists/00.json", &list)],
        );

        let mut s = PackageListSerializer::new(&path, &options(&work));
        s.load().unwrap();
        let log = s.clean_up_channel_data().unwrap();
        assert!(log.contains("DVB-S: removed 1 deleted channel(s)"));
        assert!(log.contains("DVB-S: reordered channels"));
        let uids: Vec<_> = s.data_root().channel_lists()[0]
            .channels
            .iter()
            .map(|c| c.uid.as_str())
            .collect();
        assert_eq!(uids, vec!["t1", "r1"]);
        assert_eq!(s.clean_up_channel_data(), None);
        s.dispose();
    }

    #[test]
    fn test_save_keeps_foreign_members() {
        let work = TempDir::new().unwrap();
        let path = work.path().join("lists.chz");
        let list = mixed_list();
        let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
        let opts = SimpleFileOptions::default();
        zip.start_file(paths::MANIFEST, opts).unwrap();
        zip.write_all(br#"{"format":"chanlist-package","version":1,"lists":["lists/sat.json"]}"#)
            .unwrap();
        zip.start_file("lists/sat.json", opts).unwrap();
        zip.write_all(&serde_json::to_vec(&list).unwrap()).unwrap();
        zip.start_file("device/settings.bin", opts).unwrap();
        zip.write_all(&[1, 2, 3]).unwrap();
        zip.finish().unwrap();

        let mut s = PackageListSerializer::new(&path, &options(&work));
        s.load().unwrap();
        s.save().unwrap();
        s.dispose();

        let mut archive = zip::ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert!(names.contains(&"device/settings.bin".to_string()));
        assert!(names.contains(&"lists/00.json".to_string()));
        assert!(!names.contains(&"lists/sat.json".to_string()));
        let mut bin = Vec::new();
        archive.by_name("device/settings.bin").unwrap().read_to_end(&mut bin).unwrap();
        assert_eq!(bin, vec![1, 2, 3]);
    }

    #[rstest]
    #[case::parent("../victim.json")]
    #[case::nested_parent("lists/../../victim.json")]
    #[case::absolute("ABSOLUTE")]
    #[case::current_dir("./lists/00.json")]
    #[case::empty("")]
    fn test_list_paths_outside_archive_are_rejected(#[case] rel: &str) {
        let work = TempDir::new().unwrap();
        let outside = work.path().join("victim.json");
        let victim = ChannelList::new(SignalSource::DVB_C, "Victim", "V");
        fs::write(&outside, serde_json::to_vec(&victim).unwrap()).unwrap();
        let rel = if rel == "ABSOLUTE" {
            outside.to_string_lossy().into_owned()
        } else {
            rel.to_string()
        };
        let manifest = serde_json::json!({
            "format": FORMAT_ID,
            "version": 1,
            "lists": [rel],
        });
        let path = work.path().join("lists.chz");
        write_package(&path, &manifest.to_string(), &[("lists/00.json", &mixed_list())]);

        let mut s = PackageListSerializer::new(&path, &options(&work));
        assert!(s.load().unwrap_err().is_format_error());
        assert!(s.data_root().is_empty());
        let _ = s.save();
        s.dispose();
        assert!(outside.is_file());
    }

    #[rstest]
    #[case("lists/00.json", true)]
    #[case("device/a/b.bin", true)]
    #[case("../x.json", false)]
    #[case("/etc/passwd", false)]
    #[case("", false)]
    fn test_is_archive_member(#[case] rel: &str, #[case] expected: bool) {
        assert_eq!(is_archive_member(rel), expected);
    }

    #[test]
    fn test_save_without_load_fails() {
        let work = TempDir::new().unwrap();
        let mut s = PackageListSerializer::new(&work.path().join("x.chz"), &options(&work));
        assert!(matches!(s.save(), Err(SerializerError::Archive(_))));
    }
}
