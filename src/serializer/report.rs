//! Plain-text summary of a loaded channel list file, for support requests.
//!
//! The layout is stable; tooling parses it:
//!
//! ```text
//! File name: /path/to/file
//!
//! DVB-T-----
//! number of channels: 5
//! ...
//! number of locked channels: 2
//!
//! ```

use std::fmt::Write as _;
use std::path::Path;

use crate::model::{ChannelList, DataRoot};

/// Render the report for `data_root` loaded from `file_name`.
pub fn file_information(file_name: &Path, data_root: &DataRoot) -> String {
    let mut out = String::new();
    writeln!(out, "File name: {}", file_name.display()).ok();
    out.push('\n');
    for list in data_root.channel_lists() {
        write_list_section(&mut out, list);
    }
    out
}

fn write_list_section(out: &mut String, list: &ChannelList) {
    let flags = list.flag_counts();
    writeln!(out, "{}-----", list.short_caption).ok();
    writeln!(out, "number of channels: {}", list.len()).ok();
    writeln!(
        out,
        "number of predefined channel numbers: {}",
        list.preset_program_nr_count()
    )
    .ok();
    writeln!(
        out,
        "number of duplicate program numbers: {}",
        list.duplicate_program_nr_count()
    )
    .ok();
    writeln!(
        out,
        "number of duplicate channel identifiers: {}",
        list.duplicate_uid_count()
    )
    .ok();
    writeln!(out, "number of deleted channels: {}", flags.deleted).ok();
    writeln!(out, "number of hidden channels: {}", flags.hidden).ok();
    writeln!(out, "number of skipped channels: {}", flags.skipped).ok();
    writeln!(out, "number of locked channels: {}", flags.locked).ok();
    out.push('\n');
}
