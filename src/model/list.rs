//! Channel lists and the counts reported for them.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::channel::{ChannelInfo, SignalSource};

/// Per-flag channel counts of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagCounts {
    pub deleted: usize,
    pub hidden: usize,
    pub skipped: usize,
    pub locked: usize,
}

/// An ordered list of channels sharing a signal source (e.g. "DVB-T TV").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelList {
    pub caption: String,
    pub short_caption: String,
    #[serde(default)]
    pub signal_source: SignalSource,
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
}

impl ChannelList {
    pub fn new(
        signal_source: SignalSource,
        caption: impl Into<String>,
        short_caption: impl Into<String>,
    ) -> Self {
        Self {
            caption: caption.into(),
            short_caption: short_caption.into(),
            signal_source,
            channels: Vec::new(),
        }
    }

    pub fn add_channel(&mut self, channel: ChannelInfo) {
        self.channels.push(channel);
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channels that carried a program number in the source file.
    pub fn preset_program_nr_count(&self) -> usize {
        self.channels
            .iter()
            .filter(|ch| ch.preset_program_nr.is_some())
            .count()
    }

    /// Occurrences of a preset program number beyond its first use.
    pub fn duplicate_program_nr_count(&self) -> usize {
        let mut seen = FxHashSet::default();
        self.channels
            .iter()
            .filter_map(|ch| ch.preset_program_nr)
            .filter(|nr| !seen.insert(*nr))
            .count()
    }

    /// Occurrences of a uid beyond its first use.
    pub fn duplicate_uid_count(&self) -> usize {
        let mut seen = FxHashSet::default();
        self.channels
            .iter()
            .filter(|ch| !seen.insert(ch.uid.as_str()))
            .count()
    }

    pub fn flag_counts(&self) -> FlagCounts {
        self.channels
            .iter()
            .fold(FlagCounts::default(), |mut counts, ch| {
                counts.deleted += usize::from(ch.is_deleted);
                counts.hidden += usize::from(ch.hidden);
                counts.skipped += usize::from(ch.skip);
                counts.locked += usize::from(ch.lock);
                counts
            })
    }

    /// True when every TV channel precedes every radio channel, which in turn
    /// precede every data channel.
    pub fn is_grouped_by_service_type(&self) -> bool {
        self.channels
            .windows(2)
            .all(|w| w[0].service_type.group_rank() <= w[1].service_type.group_rank())
    }
}
