//! Plugin factories and format selection.
//!
//! Each format ships a [`SerializerPlugin`] that creates serializer instances.
//! [`PluginRegistry::open`] picks the plugin for a file: candidates whose
//! extension matches are tried first, then all others. A plugin that answers
//! with [`SerializerError::Format`] passes the file on to the next candidate;
//! any other failure (including an unsupported version) ends the search.

use std::path::{Path, PathBuf};

use super::contract::ChannelSerializer;
use super::error::{Result, SerializerError};
use super::options::SerializerOptions;

/// Factory for one channel-list format.
pub trait SerializerPlugin: Send + Sync {
    /// Human-readable name of the plugin.
    fn plugin_name(&self) -> &'static str;

    /// File extensions (lowercase, without dot) this plugin usually handles.
    fn extensions(&self) -> &'static [&'static str];

    /// Create a serializer for `path`. Nothing is read until `load()`.
    fn create_serializer(
        &self,
        path: &Path,
        options: &SerializerOptions,
    ) -> Box<dyn ChannelSerializer>;

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }
}

/// Ordered set of available plugins.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn SerializerPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn SerializerPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> impl Iterator<Item = &dyn SerializerPlugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }

    /// Extension matches first, registration order otherwise.
    fn candidates(&self, path: &Path) -> Vec<&dyn SerializerPlugin> {
        let (mut first, rest): (Vec<_>, Vec<_>) =
            self.plugins().partition(|p| p.matches_extension(path));
        first.extend(rest);
        first
    }

    /// Create and load a serializer for `path` with the first plugin that
    /// recognizes it.
    pub fn open(
        &self,
        path: &Path,
        options: &SerializerOptions,
    ) -> Result<Box<dyn ChannelSerializer>> {
        for plugin in self.candidates(path) {
            let mut serializer = plugin.create_serializer(path, options);
            match serializer.load() {
                Ok(()) => {
                    tracing::debug!(
                        plugin = plugin.plugin_name(),
                        path = %path.display(),
                        "loaded channel list"
                    );
                    return Ok(serializer);
                }
                Err(e) if e.is_format_error() => {
                    tracing::debug!(
                        plugin = plugin.plugin_name(),
                        path = %path.display(),
                        error = %e,
                        "plugin does not recognize file"
                    );
                    serializer.dispose();
                }
                Err(e) => {
                    serializer.dispose();
                    return Err(e);
                }
            }
        }
        Err(SerializerError::NoPluginFound(PathBuf::from(path)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::serializer::SerializerBase;
    use crate::serializer::SupportedFeatures;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Outcome {
        Ok,
        NotMine,
        TooNew,
    }

    struct Scripted {
        base: SerializerBase,
        outcome: Outcome,
    }

    impl ChannelSerializer for Scripted {
        fn base(&self) -> &SerializerBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut SerializerBase {
            &mut self.base
        }
        fn format_description(&self) -> String {
            "Scripted".to_string()
        }
        fn load(&mut self) -> Result<()> {
            match self.outcome {
                Outcome::Ok => Ok(()),
                Outcome::NotMine => Err(SerializerError::format(self.base.file_name(), "nope")),
                Outcome::TooNew => Err(SerializerError::UnsupportedVersion("v9".into())),
            }
        }
        fn save(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct ScriptedPlugin {
        name: &'static str,
        ext: &'static [&'static str],
        outcome: Outcome,
        attempts: Arc<AtomicUsize>,
    }

    impl SerializerPlugin for ScriptedPlugin {
        fn plugin_name(&self) -> &'static str {
            self.name
        }
        fn extensions(&self) -> &'static [&'static str] {
            self.ext
        }
        fn create_serializer(
            &self,
            path: &Path,
            options: &SerializerOptions,
        ) -> Box<dyn ChannelSerializer> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Box::new(Scripted {
                base: SerializerBase::new(path, SupportedFeatures::default(), options),
                outcome: self.outcome,
            })
        }
    }

    fn plugin(
        name: &'static str,
        ext: &'static [&'static str],
        outcome: Outcome,
    ) -> (Box<dyn SerializerPlugin>, Arc<AtomicUsize>) {
        let attempts = Arc::new(AtomicUsize::new(0));
        let p = ScriptedPlugin {
            name,
            ext,
            outcome,
            attempts: attempts.clone(),
        };
        (Box::new(p), attempts)
    }

    #[test]
    fn test_format_error_falls_through() {
        let (a, a_hits) = plugin("a", &["dat"], Outcome::NotMine);
        let (b, b_hits) = plugin("b", &["xml"], Outcome::Ok);
        let mut registry = PluginRegistry::new();
        registry.register(a);
        registry.register(b);

        let s = registry
            .open(Path::new("list.dat"), &SerializerOptions::default())
            .unwrap();
        assert_eq!(s.format_description(), "Scripted");
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsupported_version_stops_search() {
        let (a, _) = plugin("a", &["dat"], Outcome::TooNew);
        let (b, b_hits) = plugin("b", &["xml"], Outcome::Ok);
        let mut registry = PluginRegistry::new();
        registry.register(a);
        registry.register(b);

        let err = registry
            .open(Path::new("list.DAT"), &SerializerOptions::default())
            .err()
            .unwrap();
        assert_eq!(err.unsupported_version(), Some("v9"));
        assert_eq!(b_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_extension_match_is_tried_first() {
        let (a, a_hits) = plugin("a", &["dat"], Outcome::Ok);
        let (b, _) = plugin("b", &["xml"], Outcome::Ok);
        let mut registry = PluginRegistry::new();
        registry.register(a);
        registry.register(b);

        registry
            .open(Path::new("list.xml"), &SerializerOptions::default())
            .unwrap();
        assert_eq!(a_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_plugin_found() {
        let (a, _) = plugin("a", &["dat"], Outcome::NotMine);
        let mut registry = PluginRegistry::new();
        registry.register(a);

        let err = registry
            .open(Path::new("list.bin"), &SerializerOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, SerializerError::NoPluginFound(_)));
    }
}
