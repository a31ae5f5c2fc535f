//! Flat text channel lists (`.chl`).
//!
//! ```text
//! #CHANLIST v1
//! [DVB-T|Antenna TV|0x0112]
//! 1;t-1-1001;Das Erste;T;0x03E9;474.0;L;0x1
//! ;t-1-1002;Test Card;D;0x03EA;474.0;DH;0x0
//! ```
//!
//! Section lines are `[short caption|caption|signal source bits]`. Channel
//! lines are `program;uid;name;type;service id;frequency MHz;flags;favorites`
//! where flags use `D`eleted, `H`idden, `S`kip, `L`ock, `E`ncrypted. Numeric
//! columns go through the tolerant parsers, so blank or garbled values read as
//! zero. Lines starting with `#` after the header are comments.
//!
//! Files are always UTF-8. The header carries no encoding marker because the
//! format has exactly one, so the instance's default encoding is not consulted
//! and non-UTF-8 input is reported as an unknown format.

use std::fmt::Write as _;
use std::path::Path;

use crate::base::{parse_decimal, parse_int, parse_long};
use crate::model::{ChannelInfo, ChannelList, DataRoot, ServiceType, SignalSource};
use crate::serializer::{
    ChannelNameEditMode, ChannelSerializer, DeletionMode, FavoritesMode, Result, SerializerBase,
    SerializerError, SerializerOptions, SerializerPlugin, SupportedFeatures, write_file_atomic,
};

const MAGIC: &str = "#CHANLIST";
const SUPPORTED_VERSION: &str = "v1";

/// Factory for [`TextListSerializer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextListPlugin;

impl SerializerPlugin for TextListPlugin {
    fn plugin_name(&self) -> &'static str {
        "Text channel list"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["chl", "txt"]
    }

    fn create_serializer(
        &self,
        path: &Path,
        options: &SerializerOptions,
    ) -> Box<dyn ChannelSerializer> {
        Box::new(TextListSerializer::new(path, options))
    }
}

/// Reads and writes the flat text format.
#[derive(Debug)]
pub struct TextListSerializer {
    base: SerializerBase,
    version: Option<String>,
}

impl TextListSerializer {
    pub fn new(path: &Path, options: &SerializerOptions) -> Self {
        let features = SupportedFeatures::default()
            .with_channel_name_edit(ChannelNameEditMode::EDIT)
            .with_deletion_mode(DeletionMode::FlaggedWithPresetNumber)
            .with_favorites(FavoritesMode::Flags, 4)
            .with_save_as(false);
        Self {
            base: SerializerBase::new(path, features, options),
            version: None,
        }
    }
}

impl ChannelSerializer for TextListSerializer {
    fn base(&self) -> &SerializerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SerializerBase {
        &mut self.base
    }

    fn format_description(&self) -> String {
        match &self.version {
            Some(v) => format!("Text channel list {v}"),
            None => "Text channel list".to_string(),
        }
    }

    fn load(&mut self) -> Result<()> {
        let path = self.base.file_name();
        let bytes = std::fs::read(path)?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| SerializerError::format(path, "not UTF-8 text"))?;
        let (version, root) = parse_document(path, text)?;
        self.version = Some(version);
        self.base.replace_data_root(root);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let target = self.base.output_path()?;
        let text = render_document(self.base.data_root());
        write_file_atomic(target, text.as_bytes())?;
        tracing::debug!(path = %target.display(), "saved text channel list");
        Ok(())
    }
}

// ============================================================================
// READER
// ============================================================================

fn parse_document(path: &Path, text: &str) -> Result<(String, DataRoot)> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty());

    let header = lines.next().map(|(_, l)| l.trim()).unwrap_or_default();
    let Some(rest) = header
        .strip_prefix(MAGIC)
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    else {
        return Err(SerializerError::format(path, "missing #CHANLIST header"));
    };
    let version = rest.trim();
    if version != SUPPORTED_VERSION {
        let detected = if version.is_empty() { "<none>" } else { version };
        return Err(SerializerError::UnsupportedVersion(format!(
            "text channel list {detected}"
        )));
    }

    let mut root = DataRoot::new();
    let mut current: Option<ChannelList> = None;
    for (line_no, line) in lines {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if let Some(done) = current.take() {
                root.add_channel_list(done);
            }
            current = Some(parse_section(section));
            continue;
        }
        let Some(list) = current.as_mut() else {
            return Err(SerializerError::format(
                path,
                format!("line {line_no}: channel before first [list] section"),
            ));
        };
        list.add_channel(parse_channel(line));
    }
    if let Some(done) = current {
        root.add_channel_list(done);
    }
    Ok((version.to_string(), root))
}

fn parse_section(section: &str) -> ChannelList {
    let mut parts = section.split('|');
    let short = parts.next().unwrap_or_default().trim();
    let caption = parts.next().map(str::trim).unwrap_or(short);
    let source = parts.next().map(parse_long).unwrap_or(0);
    ChannelList::new(
        SignalSource::from_bits_truncate(source as u32),
        caption,
        short,
    )
}

fn parse_channel(line: &str) -> ChannelInfo {
    let mut cols = line.split(';');
    let mut next = || cols.next().unwrap_or_default();

    let program = next().trim();
    let mut ch = ChannelInfo::new(next().trim(), next().trim());
    if !program.is_empty() {
        ch = ch.with_preset_program_nr(parse_int(program));
    }
    ch.service_type = ServiceType::from_code(next()).unwrap_or_default();
    ch.service_id = parse_int(next());
    ch.frequency_mhz = parse_decimal(next());
    for flag in next().chars() {
        match flag.to_ascii_uppercase() {
            'D' => ch.is_deleted = true,
            'H' => ch.hidden = true,
            'S' => ch.skip = true,
            'L' => ch.lock = true,
            'E' => ch.encrypted = true,
            _ => {}
        }
    }
    ch.favorites = parse_long(next()) as u64;
    ch
}

// ============================================================================
// WRITER
// ============================================================================

fn render_document(root: &DataRoot) -> String {
    let mut out = String::new();
    writeln!(out, "{MAGIC} {SUPPORTED_VERSION}").ok();
    for list in root.channel_lists() {
        writeln!(
            out,
            "[{}|{}|0x{:04X}]",
            clean_field(&list.short_caption),
            clean_field(&list.caption),
            list.signal_source.bits()
        )
        .ok();
        for ch in &list.channels {
            render_channel(&mut out, ch);
        }
    }
    out
}

fn render_channel(out: &mut String, ch: &ChannelInfo) {
    let program = ch
        .effective_program_nr()
        .map(|nr| nr.to_string())
        .unwrap_or_default();
    let mut flags = String::new();
    for (set, code) in [
        (ch.is_deleted, 'D'),
        (ch.hidden, 'H'),
        (ch.skip, 'S'),
        (ch.lock, 'L'),
        (ch.encrypted, 'E'),
    ] {
        if set {
            flags.push(code);
        }
    }
    writeln!(
        out,
        "{program};{};{};{};0x{:04X};{};{flags};0x{:X}",
        clean_field(&ch.uid),
        clean_field(&ch.name),
        ch.service_type.code(),
        ch.service_id,
        ch.frequency_mhz,
        ch.favorites
    )
    .ok();
}

/// Column and section separators cannot be escaped in this format.
fn clean_field(value: &str) -> String {
    value.replace([';', '|', '\n', '\r'], " ")
}
